use super::{LinkKind, StandardizedLink, StandardizedNode};
use geo::{LineString, Point};
use itertools::Itertools;
use serde::Serialize;
use wkt::ToWkt;

/// one row of a links table. transit links leave the OSM columns empty.
#[derive(Debug, Clone, Serialize)]
pub struct LinkRecord {
    #[serde(rename = "A")]
    pub a: Option<i64>,
    #[serde(rename = "B")]
    pub b: Option<i64>,
    pub osm_a: Option<i64>,
    pub osm_b: Option<i64>,
    pub highway: String,
    pub highway_orig: String,
    pub name: Option<String>,
    #[serde(rename = "ref")]
    pub _ref: Option<String>,
    pub oneway: bool,
    pub steps: bool,
    pub drive_access: bool,
    pub walk_access: bool,
    pub bike_access: bool,
    pub bus_access: bool,
    pub truck_access: bool,
    pub lanes: u32,
    pub buslanes: u32,
    pub lane_source: String,
    pub access: String,
    pub ml_access: String,
    pub ml_lanes: u32,
    pub length_meters: f64,
    pub distance: f64,
    pub county: String,
    pub model_link_id: Option<i64>,
    pub shape_id: Option<String>,
    pub osm_way_ids: String,
    pub link_kind: LinkKind,
    pub geometry: String,
    #[serde(skip)]
    pub line: LineString<f64>,
}

/// one row of a nodes table. transit stop nodes have no OSM id.
#[derive(Debug, Clone, Serialize)]
pub struct NodeRecord {
    pub osm_node_id: Option<i64>,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    pub street_count: usize,
    pub county: String,
    pub model_node_id: Option<i64>,
    pub geometry: String,
}

impl NodeRecord {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

impl From<&StandardizedLink> for LinkRecord {
    fn from(link: &StandardizedLink) -> Self {
        let ml = link.managed_lanes();
        LinkRecord {
            a: link.a.map(|id| id.0),
            b: link.b.map(|id| id.0),
            osm_a: Some(link.osm_a.0),
            osm_b: Some(link.osm_b.0),
            highway: link.highway.to_string(),
            highway_orig: link.highway_orig.clone(),
            name: link.name.clone(),
            _ref: link._ref.clone(),
            oneway: link.oneway,
            steps: link.steps,
            drive_access: link.access.drive,
            walk_access: link.access.walk,
            bike_access: link.access.bike,
            bus_access: link.access.bus,
            truck_access: link.access.truck,
            lanes: link.lanes,
            buslanes: link.buslanes,
            lane_source: link.lane_source.to_string(),
            access: ml.access.to_string(),
            ml_access: ml.ml_access.to_string(),
            ml_lanes: ml.ml_lanes,
            length_meters: link.length_meters,
            distance: link.distance(),
            county: link.county.map(|c| c.to_string()).unwrap_or_default(),
            model_link_id: link.model_link_id.map(|id| id.0),
            shape_id: link.shape_id(),
            osm_way_ids: link.way_ids.iter().map(|w| w.to_string()).join(";"),
            link_kind: LinkKind::Roadway,
            geometry: link.geometry.wkt_string(),
            line: link.geometry.clone(),
        }
    }
}

impl From<&StandardizedNode> for NodeRecord {
    fn from(node: &StandardizedNode) -> Self {
        NodeRecord {
            osm_node_id: Some(node.osmid.0),
            x: node.x,
            y: node.y,
            street_count: node.street_count,
            county: node.county.map(|c| c.to_string()).unwrap_or_default(),
            model_node_id: node.model_node_id.map(|id| id.0),
            geometry: node.get_point().wkt_string(),
        }
    }
}
