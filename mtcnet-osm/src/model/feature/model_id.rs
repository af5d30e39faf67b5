use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// identifier of a node in the model network
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct ModelNodeId(pub i64);

impl Display for ModelNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// identifier of a link in the model network
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct ModelLinkId(pub i64);

impl ModelLinkId {
    /// the geometry key written alongside each link
    pub fn shape_id(&self) -> String {
        format!("sh{}", self.0)
    }
}

impl Display for ModelLinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// the two kinds of entity that draw from separate id ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Node,
    Link,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Node => write!(f, "node"),
            EntityKind::Link => write!(f, "link"),
        }
    }
}

/// each county range is split into a roadway part and a reserved transit
/// part at the top of the range, since transit stops are not OSM nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSpace {
    Roadway,
    Transit,
}

/// half-open integer interval `[floor, ceiling)` of model ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelIdRange {
    pub floor: i64,
    pub ceiling: i64,
}

impl ModelIdRange {
    /// share of every county range set aside for transit-only entities, as 1/N
    pub const TRANSIT_RESERVE_DENOMINATOR: i64 = 10;

    pub const fn new(floor: i64, ceiling: i64) -> ModelIdRange {
        ModelIdRange { floor, ceiling }
    }

    pub fn capacity(&self) -> usize {
        (self.ceiling - self.floor).max(0) as usize
    }

    pub fn contains(&self, id: i64) -> bool {
        self.floor <= id && id < self.ceiling
    }

    pub fn overlaps(&self, other: &ModelIdRange) -> bool {
        self.floor < other.ceiling && other.floor < self.ceiling
    }

    /// the sub-range used by the given id space.
    pub fn subrange(&self, space: IdSpace) -> ModelIdRange {
        let reserved = (self.ceiling - self.floor) / Self::TRANSIT_RESERVE_DENOMINATOR;
        let boundary = self.ceiling - reserved;
        match space {
            IdSpace::Roadway => ModelIdRange::new(self.floor, boundary),
            IdSpace::Transit => ModelIdRange::new(boundary, self.ceiling),
        }
    }
}

impl Display for ModelIdRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.floor, self.ceiling)
    }
}
