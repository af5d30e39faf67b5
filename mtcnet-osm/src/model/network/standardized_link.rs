use super::LaneSource;
use crate::model::{
    feature::{County, Highway, ModeAccess, ModelLinkId, ModelNodeId},
    osm::graph::{wkt_serde, OsmNodeId, OsmWayId},
};
use geo::LineString;
use serde::{Deserialize, Serialize};

pub const FEET_PER_METER: f64 = 3.28084;
pub const FEET_PER_MILE: f64 = 5280.0;

/// the canonical roadway link between an ordered pair of OSM nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedLink {
    pub osm_a: OsmNodeId,
    pub osm_b: OsmNodeId,
    pub highway: Highway,
    /// highway tag text as found in OSM
    pub highway_orig: String,
    pub name: Option<String>,
    pub _ref: Option<String>,
    pub oneway: bool,
    pub steps: bool,
    pub access: ModeAccess,
    /// general traffic lanes
    pub lanes: u32,
    pub buslanes: u32,
    pub lane_source: LaneSource,
    #[serde(
        serialize_with = "wkt_serde::serialize_linestring",
        deserialize_with = "wkt_serde::deserialize_linestring"
    )]
    pub geometry: LineString<f64>,
    pub length_meters: f64,
    pub way_ids: Vec<OsmWayId>,
    pub county: Option<County>,
    pub model_link_id: Option<ModelLinkId>,
    pub a: Option<ModelNodeId>,
    pub b: Option<ModelNodeId>,
}

/// the managed-lane view of a link, written as the `access`, `ml_access`
/// and `ml_lanes` columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedLanes {
    pub access: &'static str,
    pub ml_access: &'static str,
    pub ml_lanes: u32,
}

impl StandardizedLink {
    pub fn endpoints(&self) -> (OsmNodeId, OsmNodeId) {
        (self.osm_a, self.osm_b)
    }

    pub fn is_named(&self) -> bool {
        self.name.as_ref().is_some_and(|n| !n.trim().is_empty())
    }

    /// length in miles
    pub fn distance(&self) -> f64 {
        self.length_meters * FEET_PER_METER / FEET_PER_MILE
    }

    pub fn shape_id(&self) -> Option<String> {
        self.model_link_id.map(|id| id.shape_id())
    }

    pub fn managed_lanes(&self) -> ManagedLanes {
        match (self.buslanes, self.lanes) {
            (0, _) => ManagedLanes {
                access: "any",
                ml_access: "any",
                ml_lanes: 0,
            },
            (_, 0) => ManagedLanes {
                access: "bus",
                ml_access: "any",
                ml_lanes: 0,
            },
            (bus, _) => ManagedLanes {
                access: "any",
                ml_access: "bus",
                ml_lanes: bus,
            },
        }
    }
}
