use super::{NetworkApp, NetworkCliError, VizFormat};
use crate::{
    cache::{FileFingerprint, StageCache, StageKey},
    config::NetworkBuildConfiguration,
};
use mtcnet_gtfs::transit::{
    self, transit_writer, StitchResult, TransitConfiguration, TransitFeed,
};
use mtcnet_osm::{
    algorithm::{county::CountyBoundaries, roadway_ops},
    config::RoadwayConfiguration,
    model::{
        feature::Geography,
        network::{roadway_writer, LinkRecord, NodeRecord, RoadwayNetwork, RoadwayWriter},
        osm::{graph::RawGraph, OsmSource},
    },
};
use serde::Serialize;
use std::path::Path;

pub const RAW_GRAPH_STAGE: (u8, &str) = (0, "raw_graph");
pub const ROADWAY_STAGE: (u8, &str) = (4, "roadway_network");
pub const GTFS_STAGE: (u8, &str) = (4, "gtfs_model");

#[derive(Serialize)]
struct RawGraphParameters<'a> {
    pbf: Option<FileFingerprint>,
    boundaries: Option<&'a FileFingerprint>,
    roadway: &'a RoadwayConfiguration,
}

#[derive(Serialize)]
struct RoadwayParameters<'a> {
    raw_graph: &'a str,
    boundaries: Option<&'a FileFingerprint>,
    roadway: &'a RoadwayConfiguration,
}

#[derive(Serialize)]
struct GtfsParameters<'a> {
    gtfs: FileFingerprint,
    boundaries: Option<&'a FileFingerprint>,
    transit: &'a TransitConfiguration,
}

/// runs every stage of a network build, writing outputs into the app's output directory.
pub fn run_pipeline(
    app: &NetworkApp,
    conf: &NetworkBuildConfiguration,
    cache: &StageCache,
) -> Result<(), NetworkCliError> {
    let geography = app.geography;
    let geo_name = geography.name_no_spaces();

    let boundaries_fp = app
        .county_boundaries
        .as_deref()
        .map(FileFingerprint::of)
        .transpose()?;
    let boundaries = match &app.county_boundaries {
        Some(f) => {
            log::info!("reading county boundaries from {f}");
            Some(CountyBoundaries::from_geojson_file(
                f,
                &conf.roadway.boundary_name_property,
            )?)
        }
        None => None,
    };

    let raw_key = StageKey::new(
        RAW_GRAPH_STAGE.0,
        RAW_GRAPH_STAGE.1,
        &geography,
        &RawGraphParameters {
            pbf: app.pbf_file.as_deref().map(FileFingerprint::of).transpose()?,
            boundaries: boundaries_fp.as_ref(),
            roadway: &conf.roadway,
        },
    )?;
    let raw = load_raw_graph(app, conf, cache, &raw_key, boundaries.as_ref())?;

    let roadway_key = StageKey::new(
        ROADWAY_STAGE.0,
        ROADWAY_STAGE.1,
        &geography,
        &RoadwayParameters {
            raw_graph: &raw_key.digest,
            boundaries: boundaries_fp.as_ref(),
            roadway: &conf.roadway,
        },
    )?;
    let network: RoadwayNetwork = cache.get_or_compute(&roadway_key, || {
        roadway_ops::build_roadway_network(&raw, &geography, boundaries.as_ref(), &conf.roadway)
            .map_err(NetworkCliError::from)
    })?;

    eprintln!();
    log::info!("  (((8))) writing roadway network");
    let roadway_dir = app.output_dir.join(format!("4_roadway_network_{geo_name}"));
    network.write_roadway(&roadway_dir, app.roadway_format, app.overwrite)?;

    let stitched = match app.gtfs_source() {
        Some(gtfs_path) => Some(build_transit(
            app,
            conf,
            cache,
            &network,
            gtfs_path,
            boundaries.as_ref(),
            boundaries_fp.as_ref(),
        )?),
        None => {
            log::info!("no GTFS input given, skipping transit stitching");
            None
        }
    };

    if app.viz_format == VizFormat::Geojson {
        let (nodes, links): (Vec<NodeRecord>, Vec<LinkRecord>) = match &stitched {
            Some(stitch) => transit_writer::combined_records(&network, stitch),
            None => (
                network.nodes.iter().map(NodeRecord::from).collect(),
                network.links.iter().map(LinkRecord::from).collect(),
            ),
        };
        let viz_path = app.output_dir.join(format!("viz_{geo_name}.geojson"));
        roadway_writer::write_visualization(&viz_path, &nodes, &links, app.overwrite)?;
        log::info!("wrote visualization to {}", viz_path.to_string_lossy());
    }

    eprintln!();
    log::info!("finished building {geography} network");
    Ok(())
}

/// the raw graph comes from the cache, or from the PBF file. without a PBF
/// file the latest cached raw graph of the geography is used.
fn load_raw_graph(
    app: &NetworkApp,
    conf: &NetworkBuildConfiguration,
    cache: &StageCache,
    key: &StageKey,
    boundaries: Option<&CountyBoundaries>,
) -> Result<RawGraph, NetworkCliError> {
    match &app.pbf_file {
        Some(pbf_file) => cache.get_or_compute(key, || {
            let extent = boundaries
                .map(|b| b.geography_polygons(&app.geography))
                .filter(|mp| !mp.0.is_empty());
            let source = OsmSource::Pbf {
                pbf_filepath: pbf_file.clone(),
                network_filter: Some(conf.roadway.element_filter.clone()),
                extent,
            };
            source.import().map_err(NetworkCliError::from)
        }),
        None => cache.load_latest(key).ok_or_else(|| {
            NetworkCliError::InvalidArguments(format!(
                "--pbf-file is required, no cached raw graph found for {}",
                app.geography
            ))
        }),
    }
}

fn build_transit(
    app: &NetworkApp,
    conf: &NetworkBuildConfiguration,
    cache: &StageCache,
    network: &RoadwayNetwork,
    gtfs_path: &str,
    boundaries: Option<&CountyBoundaries>,
    boundaries_fp: Option<&FileFingerprint>,
) -> Result<StitchResult, NetworkCliError> {
    let geography: Geography = app.geography;
    let geo_name = geography.name_no_spaces();

    eprintln!();
    log::info!("  (((9))) filtering GTFS feed");
    let gtfs_key = StageKey::new(
        GTFS_STAGE.0,
        GTFS_STAGE.1,
        &geography,
        &GtfsParameters {
            gtfs: FileFingerprint::of(gtfs_path)?,
            boundaries: boundaries_fp,
            transit: &conf.transit,
        },
    )?;
    let feed: TransitFeed = cache.get_or_compute(&gtfs_key, || {
        let gtfs = transit::read_feed(gtfs_path)?;
        let boundary = boundaries.map(|b| b.geography_polygons(&geography));
        transit::filter_feed(&gtfs, &geography, boundary.as_ref(), &conf.transit)
            .map_err(NetworkCliError::from)
    })?;

    eprintln!();
    log::info!("  (((10))) computing route frequencies");
    let frequencies = transit::compute_frequencies(
        &feed.trips,
        &conf.transit.time_periods,
        &conf.transit.frequency_method,
        conf.transit.default_onetime_headway_minutes,
    );

    eprintln!();
    log::info!("  (((11))) stitching stops onto the roadway network");
    let stitch = transit::stitch(network, &feed.stops, &conf.transit)?;

    let with_transit_dir = app
        .output_dir
        .join(format!("5_roadway_network_inc_transit_{geo_name}"));
    transit_writer::write_network_with_transit(
        &with_transit_dir,
        network,
        &stitch,
        app.roadway_format,
        app.overwrite,
    )?;
    let feed_dir = app.output_dir.join(format!("6_feed_{geo_name}"));
    transit_writer::write_feed_tables(&feed_dir, &feed, &frequencies, &stitch, app.overwrite)?;
    if !stitch.unmatched.is_empty() {
        log::warn!(
            "{} stops could not be matched to the roadway network, see {}",
            stitch.unmatched.len(),
            Path::new(&feed_dir)
                .join(transit_writer::filenames::UNMATCHED_STOPS)
                .to_string_lossy()
        );
    }
    Ok(stitch)
}

#[cfg(test)]
mod tests {
    use super::{run_pipeline, RAW_GRAPH_STAGE};
    use crate::{
        app::{NetworkApp, NetworkCliError, VizFormat},
        cache::{StageCache, StageKey},
        config::NetworkBuildConfiguration,
    };
    use flate2::read::GzDecoder;
    use geo::line_string;
    use mtcnet_gtfs::transit::transit_writer;
    use mtcnet_osm::model::{
        feature::{County, Geography},
        network::{roadway_writer::filenames, RoadwayFormat},
        osm::graph::{EdgeOrientation, OsmNodeId, OsmWayId, OsmWayTags, RawEdge, RawGraph},
    };
    use std::{collections::HashMap, io::Read, path::Path};

    fn app(output_dir: &std::path::Path) -> NetworkApp {
        NetworkApp {
            geography: Geography::County(County::Marin),
            gtfs_dir: None,
            output_dir: output_dir.to_path_buf(),
            roadway_format: RoadwayFormat::Csv,
            viz_format: VizFormat::Geojson,
            pbf_file: None,
            county_boundaries: None,
            configuration_file: None,
            overwrite: false,
        }
    }

    /// a named two-way residential street between nodes 1 and 2
    fn raw_graph() -> RawGraph {
        let positions = HashMap::from([
            (OsmNodeId(1), (-122.53, 37.97)),
            (OsmNodeId(2), (-122.52, 37.97)),
        ]);
        let tags = OsmWayTags::from_pairs(&[("highway", "residential"), ("name", "4th Street")]);
        let forward = RawEdge::new(
            OsmNodeId(1),
            OsmNodeId(2),
            OsmWayId(10),
            EdgeOrientation::Forward,
            false,
            tags.clone(),
            line_string![(x: -122.53, y: 37.97), (x: -122.52, y: 37.97)],
        );
        let reverse = RawEdge::new(
            OsmNodeId(2),
            OsmNodeId(1),
            OsmWayId(10),
            EdgeOrientation::Reverse,
            false,
            tags,
            line_string![(x: -122.52, y: 37.97), (x: -122.53, y: 37.97)],
        );
        match RawGraph::new(&positions, vec![forward, reverse]) {
            Ok(g) => g,
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_roadway_build_from_cached_raw_graph() {
        let out = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        };
        let app = app(out.path());
        let conf = NetworkBuildConfiguration::default();
        let cache = StageCache::new(&out.path().join("cache"), true);
        let seeded = StageKey::new(
            RAW_GRAPH_STAGE.0,
            RAW_GRAPH_STAGE.1,
            &app.geography,
            &"from an earlier run",
        );
        match seeded {
            Ok(key) => {
                if let Err(e) = cache.store(&key, &raw_graph()) {
                    panic!("{e}")
                }
            }
            Err(e) => panic!("{e}"),
        }
        if let Err(e) = run_pipeline(&app, &conf, &cache) {
            panic!("{e}")
        }
        let roadway_dir = out.path().join("4_roadway_network_Marin");
        assert!(roadway_dir.join(filenames::LINKS_CSV).is_file());
        assert!(roadway_dir.join(filenames::NODES_CSV).is_file());
        assert!(out.path().join("viz_Marin.geojson").is_file());
        assert!(!out.path().join("6_feed_Marin").exists());
        let cached = match std::fs::read_dir(out.path().join("cache")) {
            Ok(rd) => rd
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .filter(|n| n.starts_with("4_roadway_network_Marin_"))
                .count(),
            Err(e) => panic!("{e}"),
        };
        assert_eq!(cached, 1);
    }

    fn seed_raw_graph(cache: &StageCache, app: &NetworkApp) {
        match StageKey::new(RAW_GRAPH_STAGE.0, RAW_GRAPH_STAGE.1, &app.geography, &"seeded") {
            Ok(key) => {
                if let Err(e) = cache.store(&key, &raw_graph()) {
                    panic!("{e}")
                }
            }
            Err(e) => panic!("{e}"),
        }
    }

    /// a weekday Golden Gate route with one stop near node 1, one on node 2
    /// and one about 700 ft north of the street
    fn write_marin_feed(dir: &Path) {
        let files = [
            (
                "agency.txt",
                "agency_id,agency_name,agency_url,agency_timezone\n\
                 GG,Golden Gate Transit,https://example.com,America/Los_Angeles\n",
            ),
            (
                "stops.txt",
                "stop_id,stop_name,stop_lat,stop_lon\n\
                 M1,Near First,37.9700,-122.5298\n\
                 M2,Up The Hill,37.9720,-122.5200\n\
                 M3,On Second,37.9700,-122.5200\n",
            ),
            (
                "routes.txt",
                "route_id,agency_id,route_short_name,route_long_name,route_type\n\
                 G1,GG,22,Fourth Street,3\n",
            ),
            (
                "calendar.txt",
                "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
                 WKDY,1,1,1,1,1,0,0,20230101,20231231\n",
            ),
            (
                "trips.txt",
                "route_id,service_id,trip_id,direction_id\n\
                 G1,WKDY,T1,0\n\
                 G1,WKDY,T2,0\n",
            ),
            (
                "stop_times.txt",
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                 T1,07:00:00,07:00:00,M1,1\n\
                 T1,07:04:00,07:04:00,M3,2\n\
                 T1,07:08:00,07:08:00,M2,3\n\
                 T2,07:30:00,07:30:00,M1,1\n\
                 T2,07:34:00,07:34:00,M3,2\n\
                 T2,07:38:00,07:38:00,M2,3\n",
            ),
        ];
        for (name, contents) in files {
            if let Err(e) = std::fs::write(dir.join(name), contents) {
                panic!("{e}")
            }
        }
    }

    fn read_gz(path: &Path) -> String {
        let file = match std::fs::File::open(path) {
            Ok(f) => f,
            Err(e) => panic!("{e}"),
        };
        let mut text = String::new();
        if let Err(e) = GzDecoder::new(file).read_to_string(&mut text) {
            panic!("{e}")
        }
        text
    }

    #[test]
    fn test_transit_run_completes_with_unmatched_stop() {
        let out = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        };
        let gtfs_dir = out.path().join("gtfs");
        if let Err(e) = std::fs::create_dir_all(&gtfs_dir) {
            panic!("{e}")
        }
        write_marin_feed(&gtfs_dir);
        let mut app = app(out.path());
        app.gtfs_dir = Some(gtfs_dir.to_string_lossy().to_string());
        let conf = NetworkBuildConfiguration::default();
        let cache = StageCache::new(&out.path().join("cache"), true);
        seed_raw_graph(&cache, &app);

        if let Err(e) = run_pipeline(&app, &conf, &cache) {
            panic!("{e}")
        }

        let feed_dir = out.path().join("6_feed_Marin");
        let unmatched =
            match std::fs::read_to_string(feed_dir.join(transit_writer::filenames::UNMATCHED_STOPS)) {
                Ok(t) => t,
                Err(e) => panic!("{e}"),
            };
        let unmatched_rows = unmatched.lines().skip(1).collect::<Vec<_>>();
        assert_eq!(unmatched_rows.len(), 1);
        assert!(unmatched_rows[0].starts_with("M2"));
        for table in [
            transit_writer::filenames::STOPS,
            transit_writer::filenames::ROUTES,
            transit_writer::filenames::TRIPS,
            transit_writer::filenames::STOP_MATCHES,
            transit_writer::filenames::ROUTE_FREQUENCIES,
        ] {
            assert!(feed_dir.join(table).is_file(), "missing {table}");
        }

        let with_transit = out.path().join("5_roadway_network_inc_transit_Marin");
        let links = read_gz(&with_transit.join(filenames::LINKS_CSV));
        assert_eq!(links.lines().filter(|l| l.contains("transit_access")).count(), 1);
        assert_eq!(links.lines().filter(|l| l.contains("transit_egress")).count(), 1);
        let nodes = read_gz(&with_transit.join(filenames::NODES_CSV));
        // two roadway nodes plus the transit node of M1 below a header
        assert_eq!(nodes.lines().count(), 4);
        assert!(out.path().join("viz_Marin.geojson").is_file());
    }

    #[test]
    fn test_missing_pbf_without_cache_fails() {
        let out = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        };
        let app = app(out.path());
        let conf = NetworkBuildConfiguration::default();
        let cache = StageCache::new(&out.path().join("cache"), true);
        match run_pipeline(&app, &conf, &cache) {
            Err(NetworkCliError::InvalidArguments(msg)) => assert!(msg.contains("--pbf-file")),
            other => panic!("expected missing pbf error, got {other:?}"),
        }
    }
}
