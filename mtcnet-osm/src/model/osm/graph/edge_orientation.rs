use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// how a raw edge relates to the node order of the OSM way it was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOrientation {
    /// follows the way's node order
    Forward,
    /// runs against the way's node order on a two-way way
    Reverse,
    /// a single record standing in for both directions of travel
    Both,
}

impl Display for EdgeOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeOrientation::Forward => write!(f, "forward"),
            EdgeOrientation::Reverse => write!(f, "reverse"),
            EdgeOrientation::Both => write!(f, "both"),
        }
    }
}
