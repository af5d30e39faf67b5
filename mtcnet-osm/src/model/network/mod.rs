mod lane_source;
mod link_kind;
mod roadway_error;
mod roadway_network;
mod roadway_record;
pub mod roadway_writer;
pub(crate) mod standardized_link;
mod standardized_node;

pub use lane_source::LaneSource;
pub use link_kind::LinkKind;
pub use roadway_error::RoadwayError;
pub use roadway_network::RoadwayNetwork;
pub use roadway_record::{LinkRecord, NodeRecord};
pub use roadway_writer::{RoadwayFormat, RoadwayWriter};
pub use standardized_link::{ManagedLanes, StandardizedLink, FEET_PER_METER, FEET_PER_MILE};
pub use standardized_node::StandardizedNode;
