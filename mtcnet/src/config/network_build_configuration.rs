use super::CacheConfiguration;
use crate::app::NetworkCliError;
use mtcnet_gtfs::transit::TransitConfiguration;
use mtcnet_osm::config::RoadwayConfiguration;
use serde::{Deserialize, Serialize};

/// run configuration of the network builder. every section falls back to the
/// Bay Area defaults when omitted from the file.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct NetworkBuildConfiguration {
    pub roadway: RoadwayConfiguration,
    pub transit: TransitConfiguration,
    pub cache: CacheConfiguration,
}

impl NetworkBuildConfiguration {
    /// confirms the settings that would otherwise fail deep inside the pipeline
    pub fn validate(&self) -> Result<(), NetworkCliError> {
        self.transit.time_periods.validate()?;
        if self.transit.search_radius_feet < self.transit.colocation_tolerance_feet {
            return Err(NetworkCliError::ConfigurationError(format!(
                "search radius {} ft is smaller than the colocation tolerance {} ft",
                self.transit.search_radius_feet, self.transit.colocation_tolerance_feet
            )));
        }
        if self.transit.max_access_links == 0 {
            return Err(NetworkCliError::ConfigurationError(String::from(
                "max_access_links must be at least 1",
            )));
        }
        Ok(())
    }
}

impl TryFrom<&String> for NetworkBuildConfiguration {
    type Error = NetworkCliError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let read = || {
            std::fs::read_to_string(f).map_err(|e| {
                NetworkCliError::ConfigurationError(format!("failure reading {f}: {e}"))
            })
        };
        if f.ends_with(".toml") {
            let s = read()?;
            toml::from_str(&s).map_err(|e| {
                NetworkCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else if f.ends_with(".json") {
            let s = read()?;
            serde_json::from_str(&s).map_err(|e| {
                NetworkCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else {
            Err(NetworkCliError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NetworkBuildConfiguration;
    use mtcnet_gtfs::transit::FrequencyMethod;
    use mtcnet_osm::model::feature::County;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        if let Err(e) = std::fs::write(&path, contents) {
            panic!("{e}")
        }
        path.to_string_lossy().to_string()
    }

    fn tempdir() -> tempfile::TempDir {
        match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempdir();
        let conf = NetworkBuildConfiguration::default();
        let text = match toml::to_string(&conf) {
            Ok(t) => t,
            Err(e) => panic!("{e}"),
        };
        let f = write(&dir, "conf.toml", &text);
        match NetworkBuildConfiguration::try_from(&f) {
            Ok(read) => assert_eq!(read, conf),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir();
        let conf = NetworkBuildConfiguration::default();
        let text = match serde_json::to_string_pretty(&conf) {
            Ok(t) => t,
            Err(e) => panic!("{e}"),
        };
        let f = write(&dir, "conf.json", &text);
        match NetworkBuildConfiguration::try_from(&f) {
            Ok(read) => assert_eq!(read, conf),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir();
        let f = write(
            &dir,
            "conf.toml",
            "[transit]\nfrequency_method = \"uniform\"\nsearch_radius_feet = 300.0\n\n[cache]\nenabled = false\n",
        );
        match NetworkBuildConfiguration::try_from(&f) {
            Ok(conf) => {
                assert_eq!(conf.transit.frequency_method, FrequencyMethod::Uniform);
                assert_eq!(conf.transit.search_radius_feet, 300.0);
                assert_eq!(conf.transit.default_onetime_headway_minutes, 180);
                assert!(conf.transit.county_agencies.contains_key(&County::SanMateo));
                assert!(!conf.cache.enabled);
                assert!(conf.roadway.drop_unnamed_service);
            }
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir();
        let f = write(&dir, "conf.yaml", "roadway: {}");
        match NetworkBuildConfiguration::try_from(&f) {
            Ok(_) => panic!("expected yaml to be rejected"),
            Err(e) => assert!(e.to_string().contains("unsupported file type")),
        }
    }

    #[test]
    fn test_validate_rejects_bad_radius() {
        let mut conf = NetworkBuildConfiguration::default();
        assert!(conf.validate().is_ok());
        conf.transit.search_radius_feet = 1.0;
        assert!(conf.validate().is_err());
    }
}
