use super::{pipeline, NetworkCliError};
use crate::{cache::StageCache, config::NetworkBuildConfiguration};
use clap::{Parser, ValueEnum};
use mtcnet_osm::model::{feature::Geography, network::RoadwayFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// whether a combined GeoJSON file of nodes and links is written for viewing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum VizFormat {
    #[default]
    None,
    Geojson,
}

/// builds the MTC model roadway network for a county or the Bay Area and
/// stitches GTFS transit stops onto it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct NetworkApp {
    #[arg(help = "county name, or \"Bay Area\" for the whole region")]
    pub geography: Geography,
    #[arg(help = "GTFS directory or zip file. \"none\" skips transit stitching")]
    pub gtfs_dir: Option<String>,
    #[arg(default_value = ".", help = "output directory")]
    pub output_dir: PathBuf,
    #[arg(value_enum, default_value_t = RoadwayFormat::Csv, help = "roadway table format")]
    pub roadway_format: RoadwayFormat,
    #[arg(value_enum, default_value_t = VizFormat::None, help = "visualization output")]
    pub viz_format: VizFormat,
    #[arg(long, help = "path to .pbf file, required unless the raw graph is cached")]
    pub pbf_file: Option<String>,
    #[arg(long, help = "GeoJSON FeatureCollection of county boundary polygons")]
    pub county_boundaries: Option<String>,
    #[arg(long, help = "TOML or JSON file with network build parameters")]
    pub configuration_file: Option<String>,
    #[arg(long, help = "replace output files that already exist")]
    pub overwrite: bool,
}

impl NetworkApp {
    /// the GTFS location, unless transit is skipped
    pub fn gtfs_source(&self) -> Option<&str> {
        self.gtfs_dir
            .as_deref()
            .filter(|d| !d.eq_ignore_ascii_case("none"))
    }

    pub fn run(&self) -> Result<(), NetworkCliError> {
        let conf = match &self.configuration_file {
            None => Ok(NetworkBuildConfiguration::default()),
            Some(f) => {
                log::info!("reading network build configuration from {f}");
                NetworkBuildConfiguration::try_from(f)
            }
        }?;
        conf.validate()?;
        let cache = match conf.cache.enabled {
            true => StageCache::new(&self.cache_directory(&conf), true),
            false => StageCache::disabled(),
        };
        log::info!(
            "building {} network into {}",
            self.geography,
            self.output_dir.to_string_lossy()
        );
        pipeline::run_pipeline(self, &conf, &cache)
    }

    fn cache_directory(&self, conf: &NetworkBuildConfiguration) -> PathBuf {
        let dir = Path::new(&conf.cache.directory);
        match dir.is_absolute() {
            true => dir.to_path_buf(),
            false => self.output_dir.join(dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NetworkApp, VizFormat};
    use clap::Parser;
    use mtcnet_osm::model::{
        feature::{County, Geography},
        network::RoadwayFormat,
    };

    #[test]
    fn test_positional_arguments() {
        let args = ["mtcnet", "San Francisco", "gtfs", "out", "geojson", "geojson"];
        match NetworkApp::try_parse_from(args) {
            Ok(app) => {
                assert_eq!(app.geography, Geography::County(County::SanFrancisco));
                assert_eq!(app.gtfs_source(), Some("gtfs"));
                assert_eq!(app.roadway_format, RoadwayFormat::Geojson);
                assert_eq!(app.viz_format, VizFormat::Geojson);
            }
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_defaults_and_flags() {
        let args = ["mtcnet", "Bay Area", "--pbf-file", "norcal.osm.pbf"];
        match NetworkApp::try_parse_from(args) {
            Ok(app) => {
                assert_eq!(app.geography, Geography::BayArea);
                assert_eq!(app.gtfs_source(), None);
                assert_eq!(app.roadway_format, RoadwayFormat::Csv);
                assert_eq!(app.viz_format, VizFormat::None);
                assert_eq!(app.pbf_file.as_deref(), Some("norcal.osm.pbf"));
            }
            Err(e) => panic!("{e}"),
        }
        let skipped = NetworkApp::try_parse_from(["mtcnet", "Marin", "none", "out"]);
        match skipped {
            Ok(app) => assert_eq!(app.gtfs_source(), None),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_unknown_county_rejected() {
        assert!(NetworkApp::try_parse_from(["mtcnet", "Los Angeles"]).is_err());
    }
}
