use super::{
    stop_matching::{compute_haversine, NodeMatch, StopMatcher},
    FeedStop, TransitConfiguration, TransitError,
};
use geo::{line_string, LineString};
use itertools::Itertools;
use kdam::tqdm;
use mtcnet_osm::{
    algorithm::model_id::ModelIdAllocator,
    model::{
        feature::{County, EntityKind, IdSpace, ModeAccess, ModelLinkId, ModelNodeId},
        network::{
            LaneSource, LinkKind, LinkRecord, NodeRecord, RoadwayNetwork, StandardizedNode,
        },
    },
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uom::si::length::meter;
use wkt::ToWkt;

/// how a stop was attached to the roadway network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopMatchKind {
    /// the stop sits on a roadway node and reuses it
    Colocated,
    /// the stop became a transit-only node with access and egress links
    TransitNode,
    /// no roadway node within the search radius
    Unmatched,
}

impl Display for StopMatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopMatchKind::Colocated => write!(f, "colocated"),
            StopMatchKind::TransitNode => write!(f, "transit_node"),
            StopMatchKind::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// one row of the stop matches report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopMatch {
    pub stop_id: String,
    pub match_kind: StopMatchKind,
    /// the model node representing the stop
    pub model_node_id: Option<i64>,
    /// the roadway node the stop is colocated with or connected to first
    pub osm_node_id: Option<i64>,
    pub distance_feet: Option<f64>,
    pub county: Option<County>,
}

/// a stop without a colocated roadway node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitNode {
    pub stop_id: String,
    pub x: f64,
    pub y: f64,
    pub county: County,
    pub model_node_id: ModelNodeId,
}

/// a walk link joining a transit node to the roadway
#[derive(Debug, Clone, PartialEq)]
pub struct TransitLink {
    pub stop_id: String,
    pub link_kind: LinkKind,
    pub a: ModelNodeId,
    pub b: ModelNodeId,
    pub county: County,
    pub model_link_id: ModelLinkId,
    pub geometry: LineString<f64>,
    pub length_meters: f64,
}

/// one row of the unmatched stops report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedStop {
    pub stop_id: String,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    pub nearest_osm_node_id: Option<i64>,
    pub nearest_distance_feet: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct StitchResult {
    pub stop_matches: Vec<StopMatch>,
    pub transit_nodes: Vec<TransitNode>,
    pub transit_links: Vec<TransitLink>,
    pub unmatched: Vec<UnmatchedStop>,
}

/// attaches each stop to the roadway network. a stop within the colocation
/// tolerance of a roadway node maps onto it. otherwise it becomes a transit
/// node numbered in the county transit sub-range, connected by an access and
/// an egress link to each of its nearest roadway nodes within the search
/// radius. stops with no roadway node in range are reported as unmatched.
pub fn stitch(
    network: &RoadwayNetwork,
    stops: &[FeedStop],
    config: &TransitConfiguration,
) -> Result<StitchResult, TransitError> {
    let matcher = StopMatcher::new(network);
    let mut allocator = ModelIdAllocator::new(IdSpace::Transit);
    let mut result = StitchResult::default();

    let sorted_stops = stops.iter().sorted_by(|a, b| a.stop_id.cmp(&b.stop_id));
    for stop in tqdm!(sorted_stops, desc = "stitch stops", total = stops.len()) {
        let point = stop.get_point();
        let nearest = matcher.nearest(&point);

        if let Some(m) = nearest.filter(|m| m.distance_feet <= config.colocation_tolerance_feet) {
            let node = &network.nodes[m.node_index];
            let model_id = roadway_model_id(node)?;
            result.stop_matches.push(StopMatch {
                stop_id: stop.stop_id.clone(),
                match_kind: StopMatchKind::Colocated,
                model_node_id: Some(model_id.0),
                osm_node_id: Some(node.osmid.0),
                distance_feet: Some(m.distance_feet),
                county: node.county,
            });
            continue;
        }

        let candidates =
            matcher.nearest_within(&point, config.search_radius_feet, config.max_access_links);
        let Some(first) = candidates.first() else {
            log::warn!(
                "stop {} has no roadway node within {} ft (nearest {}), leaving it unmatched",
                stop.stop_id,
                config.search_radius_feet,
                describe_nearest(network, nearest)
            );
            result.stop_matches.push(StopMatch {
                stop_id: stop.stop_id.clone(),
                match_kind: StopMatchKind::Unmatched,
                model_node_id: None,
                osm_node_id: None,
                distance_feet: None,
                county: None,
            });
            result.unmatched.push(UnmatchedStop {
                stop_id: stop.stop_id.clone(),
                x: stop.x,
                y: stop.y,
                nearest_osm_node_id: nearest.map(|m| network.nodes[m.node_index].osmid.0),
                nearest_distance_feet: nearest.map(|m| m.distance_feet),
            });
            continue;
        };

        let county = network.nodes[first.node_index]
            .county
            .unwrap_or(County::External);
        let stop_node_id = ModelNodeId(allocator.next_id(&county, EntityKind::Node)?);
        for candidate in candidates.iter() {
            let road = &network.nodes[candidate.node_index];
            let road_id = roadway_model_id(road)?;
            let access: LineString<f64> = line_string![point.0, road.get_point().0];
            let length_meters = compute_haversine(point, road.get_point()).get::<meter>();
            let pairs = [
                (LinkKind::TransitAccess, stop_node_id, road_id, access.clone()),
                (
                    LinkKind::TransitEgress,
                    road_id,
                    stop_node_id,
                    access.into_iter().rev().collect::<LineString<f64>>(),
                ),
            ];
            for (link_kind, a, b, geometry) in pairs {
                let model_link_id = ModelLinkId(allocator.next_id(&county, EntityKind::Link)?);
                result.transit_links.push(TransitLink {
                    stop_id: stop.stop_id.clone(),
                    link_kind,
                    a,
                    b,
                    county,
                    model_link_id,
                    geometry,
                    length_meters,
                });
            }
        }
        result.stop_matches.push(StopMatch {
            stop_id: stop.stop_id.clone(),
            match_kind: StopMatchKind::TransitNode,
            model_node_id: Some(stop_node_id.0),
            osm_node_id: Some(network.nodes[first.node_index].osmid.0),
            distance_feet: Some(first.distance_feet),
            county: Some(county),
        });
        result.transit_nodes.push(TransitNode {
            stop_id: stop.stop_id.clone(),
            x: stop.x,
            y: stop.y,
            county,
            model_node_id: stop_node_id,
        });
    }
    eprintln!();

    let colocated = result
        .stop_matches
        .iter()
        .filter(|m| m.match_kind == StopMatchKind::Colocated)
        .count();
    log::info!(
        "stitched {} stops: {} colocated, {} transit nodes with {} links, {} unmatched",
        stops.len(),
        colocated,
        result.transit_nodes.len(),
        result.transit_links.len(),
        result.unmatched.len()
    );
    Ok(result)
}

fn roadway_model_id(node: &StandardizedNode) -> Result<ModelNodeId, TransitError> {
    node.model_node_id
        .ok_or_else(|| TransitError::MissingModelIdError(node.osmid.to_string()))
}

fn describe_nearest(network: &RoadwayNetwork, nearest: Option<NodeMatch>) -> String {
    match nearest {
        Some(m) => format!(
            "node {} at {:.0} ft",
            network.nodes[m.node_index].osmid, m.distance_feet
        ),
        None => String::from("none"),
    }
}

impl From<&TransitNode> for NodeRecord {
    fn from(node: &TransitNode) -> Self {
        NodeRecord {
            osm_node_id: None,
            x: node.x,
            y: node.y,
            street_count: 0,
            county: node.county.to_string(),
            model_node_id: Some(node.model_node_id.0),
            geometry: geo::Point::new(node.x, node.y).wkt_string(),
        }
    }
}

impl From<&TransitLink> for LinkRecord {
    fn from(link: &TransitLink) -> Self {
        let access = ModeAccess::walk_only();
        LinkRecord {
            a: Some(link.a.0),
            b: Some(link.b.0),
            osm_a: None,
            osm_b: None,
            highway: String::new(),
            highway_orig: String::new(),
            name: None,
            _ref: None,
            oneway: true,
            steps: false,
            drive_access: access.drive,
            walk_access: access.walk,
            bike_access: access.bike,
            bus_access: access.bus,
            truck_access: access.truck,
            lanes: 0,
            buslanes: 0,
            lane_source: LaneSource::Default.to_string(),
            access: String::from("any"),
            ml_access: String::from("any"),
            ml_lanes: 0,
            length_meters: link.length_meters,
            distance: link.length_meters * mtcnet_osm::model::network::FEET_PER_METER
                / mtcnet_osm::model::network::FEET_PER_MILE,
            county: link.county.to_string(),
            model_link_id: Some(link.model_link_id.0),
            shape_id: Some(link.model_link_id.shape_id()),
            osm_way_ids: String::new(),
            link_kind: link.link_kind,
            geometry: link.geometry.wkt_string(),
            line: link.geometry.clone(),
        }
    }
}
