use super::{
    date_ops::{self, ServiceCalendar},
    FeedRoute, FeedStop, FeedTrip, MissingStopLocationPolicy, TransitConfiguration, TransitError,
    TransitFeed,
};
use geo::{Contains, MultiPolygon, Point};
use gtfs_structures::{DirectionType, Gtfs, Stop, StopTime, Trip};
use itertools::Itertools;
use kdam::tqdm;
use mtcnet_osm::model::feature::Geography;
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

/// reads a GTFS directory or zip archive
pub fn read_feed(gtfs_path: &str) -> Result<Gtfs, TransitError> {
    let gtfs = Gtfs::new(gtfs_path)?;
    log::info!(
        "read GTFS {gtfs_path} with {} routes, {} trips and {} stops",
        gtfs.routes.len(),
        gtfs.trips.len(),
        gtfs.stops.len()
    );
    Ok(gtfs)
}

/// keeps the trips of a GTFS feed that run on the service date, belong to an
/// allowed agency and, when a boundary is given, keep at least two stops inside it.
pub fn filter_feed(
    gtfs: &Gtfs,
    geography: &Geography,
    boundary: Option<&MultiPolygon<f64>>,
    config: &TransitConfiguration,
) -> Result<TransitFeed, TransitError> {
    let date = config.service_date;
    let calendars = gtfs
        .calendar
        .iter()
        .map(|(id, c)| (id.clone(), ServiceCalendar::from(c)))
        .collect::<HashMap<_, _>>();
    let exceptions = date_ops::service_exceptions(gtfs);
    let stop_locations = stop_locations(gtfs, &config.missing_stop_location_policy)?;
    let sole_agency = match gtfs.agencies.as_slice() {
        [only] => only.id.clone(),
        _ => None,
    };

    let mut counts = FilterCounts::default();
    let mut trips: Vec<FeedTrip> = vec![];
    let trips_iter = tqdm!(
        gtfs.trips.values().sorted_by(|a, b| a.id.cmp(&b.id)),
        desc = "filter trips",
        total = gtfs.trips.len()
    );
    for trip in trips_iter {
        let active = date_ops::is_service_active(
            calendars.get(&trip.service_id),
            exceptions.get(&trip.service_id),
            &date,
        );
        if !active {
            counts.inactive += 1;
            continue;
        }
        let agency_id = gtfs
            .routes
            .get(&trip.route_id)
            .and_then(|r| r.agency_id.clone())
            .or_else(|| sole_agency.clone());
        if !config.agency_allowed(geography, agency_id.as_deref()) {
            counts.agency += 1;
            continue;
        }
        let kept = ordered_stop_times(trip)
            .into_iter()
            .filter(|st| match stop_locations.get(&st.stop.id) {
                Some(point) => boundary.map_or(true, |b| b.contains(point)),
                None => false,
            })
            .collect::<Vec<_>>();
        if kept.len() < 2 {
            counts.boundary += 1;
            continue;
        }
        let first_departure = match kept.iter().find_map(|st| st.departure_time.or(st.arrival_time)) {
            Some(t) => t,
            None => {
                log::warn!("trip {} has no departure or arrival times, skipping", trip.id);
                counts.untimed += 1;
                continue;
            }
        };
        trips.push(FeedTrip {
            trip_id: trip.id.clone(),
            route_id: trip.route_id.clone(),
            service_id: trip.service_id.clone(),
            direction_id: trip.direction_id.map(|d| match d {
                DirectionType::Outbound => 0,
                DirectionType::Inbound => 1,
            }),
            first_departure,
            stop_ids: kept.iter().map(|st| st.stop.id.clone()).collect(),
        });
    }
    eprintln!();

    let stop_ids = trips
        .iter()
        .flat_map(|t| t.stop_ids.iter())
        .collect::<BTreeSet<_>>();
    let stops = stop_ids
        .into_iter()
        .filter_map(|id| {
            stop_locations.get(id).map(|p| FeedStop {
                stop_id: id.clone(),
                x: p.x(),
                y: p.y(),
            })
        })
        .collect::<Vec<_>>();
    let route_ids = trips.iter().map(|t| &t.route_id).collect::<BTreeSet<_>>();
    let routes = route_ids
        .into_iter()
        .filter_map(|id| gtfs.routes.get(id))
        .map(|r| FeedRoute {
            route_id: r.id.clone(),
            agency_id: r.agency_id.clone().or_else(|| sole_agency.clone()),
            route_type: format!("{:?}", r.route_type),
        })
        .collect::<Vec<_>>();

    log::info!(
        "kept {} of {} trips on {date} ({} not in service, {} other agencies, {} outside {geography}, {} without times)",
        trips.len(),
        gtfs.trips.len(),
        counts.inactive,
        counts.agency,
        counts.boundary,
        counts.untimed
    );
    if trips.is_empty() {
        log::warn!("no transit trips remain for {geography} on {date}");
    }
    Ok(TransitFeed {
        service_date: date,
        stops,
        routes,
        trips,
    })
}

#[derive(Default)]
struct FilterCounts {
    inactive: usize,
    agency: usize,
    boundary: usize,
    untimed: usize,
}

/// location of every usable stop. a stop without coordinates takes those of
/// its parent station; otherwise the policy decides between failing and dropping.
fn stop_locations(
    gtfs: &Gtfs,
    policy: &MissingStopLocationPolicy,
) -> Result<HashMap<String, Point<f64>>, TransitError> {
    let mut locations = HashMap::new();
    for (stop_id, stop) in gtfs.stops.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        match get_stop_location(stop, gtfs) {
            Some(point) => {
                locations.insert(stop_id.clone(), point);
            }
            None => match policy {
                MissingStopLocationPolicy::Fail => {
                    return Err(TransitError::MissingStopLocationAndParentError(
                        stop_id.clone(),
                    ))
                }
                MissingStopLocationPolicy::DropStop => {
                    log::warn!("stop {stop_id} has no location or parent location, dropping it");
                }
            },
        }
    }
    Ok(locations)
}

fn get_stop_location(stop: &Arc<Stop>, gtfs: &Gtfs) -> Option<Point<f64>> {
    if let (Some(lon), Some(lat)) = (stop.longitude, stop.latitude) {
        return Some(Point::new(lon, lat));
    }
    stop.parent_station
        .as_ref()
        .and_then(|parent_id| gtfs.stops.get(parent_id))
        .and_then(|parent| match (parent.longitude, parent.latitude) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        })
}

/// stop times in ascending stop_sequence
fn ordered_stop_times(trip: &Trip) -> Vec<&StopTime> {
    trip.stop_times
        .iter()
        .sorted_by_key(|st| st.stop_sequence)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{filter_feed, read_feed};
    use crate::transit::{MissingStopLocationPolicy, TransitConfiguration};
    use geo::{polygon, MultiPolygon};
    use gtfs_structures::Gtfs;
    use mtcnet_osm::model::feature::{County, Geography};
    use std::path::Path;

    /// a tiny feed: route R1 (agency SF) runs two weekday trips along stops
    /// S1-S2-S3, route R2 (agency SI) runs one trip, and a weekend-only trip
    /// and a deleted-date trip never run on the service date.
    pub(crate) fn write_fixture(dir: &Path) {
        let files = [
            (
                "agency.txt",
                "agency_id,agency_name,agency_url,agency_timezone\n\
                 SF,Muni,https://example.com,America/Los_Angeles\n\
                 SI,Shuttle,https://example.com,America/Los_Angeles\n",
            ),
            (
                "stops.txt",
                "stop_id,stop_name,stop_lat,stop_lon,location_type,parent_station\n\
                 STATION,Station,37.7500,-122.4500,1,\n\
                 S1,First,37.7500,-122.4400,0,\n\
                 S2,Second,,,0,STATION\n\
                 S3,Third,37.7500,-122.3500,0,\n\
                 S4,Nowhere,,,0,\n",
            ),
            (
                "routes.txt",
                "route_id,agency_id,route_short_name,route_long_name,route_type\n\
                 R1,SF,1,One,3\n\
                 R2,SI,2,Two,3\n",
            ),
            (
                "calendar.txt",
                "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
                 WKDY,1,1,1,1,1,0,0,20230101,20231231\n\
                 WKND,0,0,0,0,0,1,1,20230101,20231231\n",
            ),
            (
                "calendar_dates.txt",
                "service_id,date,exception_type\n\
                 HOLIDAY,20230927,2\n",
            ),
            (
                "trips.txt",
                "route_id,service_id,trip_id,direction_id\n\
                 R1,WKDY,T1,0\n\
                 R1,WKDY,T2,0\n\
                 R2,WKDY,T3,1\n\
                 R1,WKND,T4,0\n\
                 R1,HOLIDAY,T5,0\n",
            ),
            (
                "stop_times.txt",
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                 T1,07:00:00,07:00:00,S1,1\n\
                 T1,07:05:00,07:05:00,S2,2\n\
                 T1,07:10:00,07:10:00,S3,3\n\
                 T2,07:30:00,07:30:00,S1,1\n\
                 T2,07:35:00,07:35:00,S2,2\n\
                 T2,07:40:00,07:40:00,S3,3\n\
                 T3,08:00:00,08:00:00,S1,1\n\
                 T3,08:05:00,08:05:00,S3,2\n\
                 T4,09:00:00,09:00:00,S1,1\n\
                 T4,09:05:00,09:05:00,S3,2\n\
                 T5,10:00:00,10:00:00,S1,1\n\
                 T5,10:05:00,10:05:00,S4,2\n",
            ),
        ];
        for (name, contents) in files {
            if let Err(e) = std::fs::write(dir.join(name), contents) {
                panic!("{e}")
            }
        }
    }

    pub(crate) fn fixture() -> (tempfile::TempDir, Gtfs) {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        };
        write_fixture(dir.path());
        let path = dir.path().to_string_lossy().to_string();
        match read_feed(&path) {
            Ok(gtfs) => (dir, gtfs),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_service_day_and_agency_filter() {
        let (_dir, gtfs) = fixture();
        let config = TransitConfiguration::default();
        match filter_feed(&gtfs, &Geography::BayArea, None, &config) {
            Ok(feed) => {
                let ids = feed.trips.iter().map(|t| t.trip_id.as_str()).collect::<Vec<_>>();
                assert_eq!(ids, vec!["T1", "T2"]);
                assert_eq!(feed.trips[0].first_departure, 7 * 3600);
                assert_eq!(feed.trips[0].direction_id, Some(0));
                let stops = feed.stops.iter().map(|s| s.stop_id.as_str()).collect::<Vec<_>>();
                assert_eq!(stops, vec!["S1", "S2", "S3"]);
                // S2 takes the location of its parent station
                assert!((feed.stops[1].x - -122.45).abs() < 1e-9);
                assert_eq!(feed.routes.len(), 1);
            }
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_boundary_trims_stops() {
        let (_dir, gtfs) = fixture();
        let config = TransitConfiguration::default();
        // excludes S3 at x = -122.35
        let boundary = MultiPolygon::new(vec![polygon![
            (x: -122.5, y: 37.7),
            (x: -122.4, y: 37.7),
            (x: -122.4, y: 37.8),
            (x: -122.5, y: 37.8),
        ]]);
        let sf = Geography::County(County::SanFrancisco);
        match filter_feed(&gtfs, &sf, Some(&boundary), &config) {
            Ok(feed) => {
                assert_eq!(feed.trips.len(), 2);
                assert!(feed.trips.iter().all(|t| t.stop_ids == vec!["S1", "S2"]));
            }
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_missing_stop_location_policy() {
        let (_dir, gtfs) = fixture();
        let config = TransitConfiguration {
            missing_stop_location_policy: MissingStopLocationPolicy::Fail,
            ..Default::default()
        };
        assert!(filter_feed(&gtfs, &Geography::BayArea, None, &config).is_err());
    }
}
