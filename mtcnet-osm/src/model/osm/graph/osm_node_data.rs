use geo::Point;
use serde::{Deserialize, Serialize};

use super::OsmNodeId;

/// an OSM node as read from the .pbf file. tags are not retained since the
/// roadway model only needs node positions.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct OsmNodeData {
    pub osmid: OsmNodeId,
    pub x: f64,
    pub y: f64,
}

impl OsmNodeData {
    pub fn new(osmid: OsmNodeId, x: f64, y: f64) -> OsmNodeData {
        OsmNodeData { osmid, x, y }
    }

    pub fn get_point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

impl From<&osmpbf::elements::Node<'_>> for OsmNodeData {
    fn from(node: &osmpbf::elements::Node) -> Self {
        OsmNodeData::new(OsmNodeId(node.id()), node.lon(), node.lat())
    }
}

impl From<&osmpbf::dense::DenseNode<'_>> for OsmNodeData {
    fn from(node: &osmpbf::dense::DenseNode<'_>) -> Self {
        OsmNodeData::new(OsmNodeId(node.id()), node.lon(), node.lat())
    }
}
