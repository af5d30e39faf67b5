use serde::{Deserialize, Serialize};

/// how the general-traffic lane count of a link was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneSource {
    /// read from the way's lane tags
    Tagged,
    /// most common tagged count of the link's highway class
    ClassMode,
    /// no comparable statistic, or a class without general lanes
    #[default]
    Default,
}

impl std::fmt::Display for LaneSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LaneSource::Tagged => "tagged",
            LaneSource::ClassMode => "class_mode",
            LaneSource::Default => "default",
        };
        write!(f, "{s}")
    }
}
