use crate::model::feature::{County, EntityKind, ModelIdRange};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelIdError {
    #[error("county {county} exceeded allocated {kind} ID range: {count} entities for {capacity} ids")]
    RangeExceeded {
        county: County,
        kind: EntityKind,
        count: usize,
        capacity: usize,
    },
    #[error("{kind} ID range of {a} ({range_a}) overlaps the range of {b} ({range_b})")]
    OverlappingRanges {
        kind: EntityKind,
        a: County,
        range_a: ModelIdRange,
        b: County,
        range_b: ModelIdRange,
    },
    #[error("{0} has no county assigned")]
    MissingCounty(String),
    #[error("link ({0}, {1}) has an endpoint with no model node id")]
    UnassignedEndpoint(String, String),
}
