use crate::{algorithm::county::county_boundaries::DEFAULT_NAME_PROPERTY, model::osm::graph::ElementFilter};
use serde::{Deserialize, Serialize};

/// defines behaviors for building the standardized roadway network
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct RoadwayConfiguration {
    pub element_filter: ElementFilter,
    /// remove `service` links without a name after deduplication
    pub drop_unnamed_service: bool,
    /// remove links outside of the convex hull of the run's county polygons
    pub clip_to_region: bool,
    /// GeoJSON property holding the county name
    pub boundary_name_property: String,
    /// lanes used when a motorized class has no tagged lanes anywhere
    pub default_lanes: u32,
}

impl Default for RoadwayConfiguration {
    fn default() -> Self {
        Self {
            element_filter: ElementFilter::default(),
            drop_unnamed_service: true,
            clip_to_region: true,
            boundary_name_property: String::from(DEFAULT_NAME_PROPERTY),
            default_lanes: 1,
        }
    }
}
