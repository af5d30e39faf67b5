use crate::model::{
    feature::{County, ModelNodeId},
    osm::graph::{OsmNodeId, RawNode},
};
use geo::Point;
use serde::{Deserialize, Serialize};

/// a roadway node referenced by at least one standardized link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedNode {
    pub osmid: OsmNodeId,
    pub x: f64,
    pub y: f64,
    pub street_count: usize,
    pub county: Option<County>,
    pub model_node_id: Option<ModelNodeId>,
}

impl StandardizedNode {
    pub fn get_point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

impl From<&RawNode> for StandardizedNode {
    fn from(value: &RawNode) -> Self {
        StandardizedNode {
            osmid: value.osmid,
            x: value.x,
            y: value.y,
            street_count: value.street_count,
            county: None,
            model_node_id: None,
        }
    }
}
