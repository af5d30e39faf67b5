use serde::{Deserialize, Serialize};

/// where stage snapshots are kept, relative paths resolving against the output directory
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfiguration {
    pub enabled: bool,
    pub directory: String,
}

impl Default for CacheConfiguration {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: String::from("cache"),
        }
    }
}
