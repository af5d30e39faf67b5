use super::{FeedTrip, RouteFrequency, StitchResult, TransitError, TransitFeed};
use kdam::tqdm;
use mtcnet_osm::model::network::{
    roadway_writer, LinkRecord, NodeRecord, RoadwayFormat, RoadwayNetwork,
};
use serde::Serialize;
use std::path::Path;

pub mod filenames {
    pub const STOPS: &str = "stops.csv";
    pub const ROUTES: &str = "routes.csv";
    pub const TRIPS: &str = "trips.csv";
    pub const STOP_MATCHES: &str = "stop_matches.csv";
    pub const ROUTE_FREQUENCIES: &str = "route_frequencies.csv";
    pub const UNMATCHED_STOPS: &str = "unmatched_stops.csv";
}

#[derive(Serialize)]
struct TripRow<'a> {
    trip_id: &'a str,
    route_id: &'a str,
    service_id: &'a str,
    direction_id: Option<u8>,
    first_departure: u32,
    n_stops: usize,
}

impl<'a> From<&'a FeedTrip> for TripRow<'a> {
    fn from(trip: &'a FeedTrip) -> Self {
        TripRow {
            trip_id: &trip.trip_id,
            route_id: &trip.route_id,
            service_id: &trip.service_id,
            direction_id: trip.direction_id,
            first_departure: trip.first_departure,
            n_stops: trip.stop_ids.len(),
        }
    }
}

/// roadway rows followed by transit node and link rows
pub fn combined_records(
    network: &RoadwayNetwork,
    stitch: &StitchResult,
) -> (Vec<NodeRecord>, Vec<LinkRecord>) {
    let nodes = network
        .nodes
        .iter()
        .map(NodeRecord::from)
        .chain(stitch.transit_nodes.iter().map(NodeRecord::from))
        .collect::<Vec<_>>();
    let links = network
        .links
        .iter()
        .map(LinkRecord::from)
        .chain(stitch.transit_links.iter().map(LinkRecord::from))
        .collect::<Vec<_>>();
    (nodes, links)
}

/// writes the roadway tables with transit nodes and links appended.
pub fn write_network_with_transit(
    output_directory: &Path,
    network: &RoadwayNetwork,
    stitch: &StitchResult,
    format: RoadwayFormat,
    overwrite: bool,
) -> Result<(), TransitError> {
    let (nodes, links) = combined_records(network, stitch);
    roadway_writer::write_records(output_directory, &nodes, &links, format, overwrite)?;
    Ok(())
}

/// writes the filtered feed tables along with the frequency and stop matching reports.
pub fn write_feed_tables(
    output_directory: &Path,
    feed: &TransitFeed,
    frequencies: &[RouteFrequency],
    stitch: &StitchResult,
    overwrite: bool,
) -> Result<(), TransitError> {
    std::fs::create_dir_all(output_directory).map_err(|e| {
        TransitError::IoError(output_directory.to_string_lossy().to_string(), e)
    })?;
    let trips = feed.trips.iter().map(TripRow::from).collect::<Vec<_>>();
    write_table(output_directory, filenames::STOPS, &feed.stops, overwrite)?;
    write_table(output_directory, filenames::ROUTES, &feed.routes, overwrite)?;
    write_table(output_directory, filenames::TRIPS, &trips, overwrite)?;
    write_table(output_directory, filenames::STOP_MATCHES, &stitch.stop_matches, overwrite)?;
    write_table(output_directory, filenames::ROUTE_FREQUENCIES, frequencies, overwrite)?;
    write_table(output_directory, filenames::UNMATCHED_STOPS, &stitch.unmatched, overwrite)?;
    log::info!(
        "wrote feed tables for {} trips to {}",
        feed.trips.len(),
        output_directory.to_string_lossy()
    );
    Ok(())
}

fn write_table<T: Serialize>(
    directory: &Path,
    filename: &str,
    rows: &[T],
    overwrite: bool,
) -> Result<(), TransitError> {
    let filepath = directory.join(filename);
    let filepath_str = filepath.to_string_lossy().to_string();
    if filepath.exists() && !overwrite {
        return Err(TransitError::IoError(
            filepath_str,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "output file exists"),
        ));
    }
    let mut writer = csv::Writer::from_path(&filepath)
        .map_err(|e| TransitError::CsvWriteError(filepath_str.clone(), e))?;
    for row in tqdm!(rows.iter(), desc = filename, total = rows.len()) {
        writer
            .serialize(row)
            .map_err(|e| TransitError::CsvWriteError(filepath_str.clone(), e))?;
    }
    eprintln!();
    writer
        .flush()
        .map_err(|e| TransitError::IoError(filepath_str, e))?;
    Ok(())
}
