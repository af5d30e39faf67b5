use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    #[default]
    Roadway,
    /// stop node to roadway node
    TransitAccess,
    /// roadway node to stop node
    TransitEgress,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LinkKind::Roadway => "roadway",
            LinkKind::TransitAccess => "transit_access",
            LinkKind::TransitEgress => "transit_egress",
        };
        write!(f, "{s}")
    }
}
