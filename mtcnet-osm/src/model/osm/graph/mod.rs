mod edge_orientation;
pub mod osm_element_filter;
mod osm_id;
mod osm_node_data;
mod osm_way_data;
mod osm_way_tags;
mod raw_graph;
pub mod wkt_serde;

pub use edge_orientation::EdgeOrientation;
pub use osm_element_filter::ElementFilter;
pub use osm_id::{OsmNodeId, OsmWayId};
pub use osm_node_data::OsmNodeData;
pub use osm_way_data::OsmWayData;
pub use osm_way_tags::OsmWayTags;
pub use raw_graph::{RawEdge, RawGraph, RawNode};

use std::collections::HashMap;

pub type OsmNodes = HashMap<OsmNodeId, OsmNodeData>;
pub type OsmWays = HashMap<OsmWayId, OsmWayData>;
