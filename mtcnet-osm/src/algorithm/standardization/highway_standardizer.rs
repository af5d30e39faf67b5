use crate::model::{
    feature::{parse_access_value, Highway, ModeAccess},
    network::{LaneSource, StandardizedLink},
    osm::graph::{OsmWayTags, RawEdge},
};
use kdam::tqdm;
use std::str::FromStr;

/// result of reducing a (possibly multi-valued) OSM highway tag to a single class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighwayResolution {
    pub highway: Highway,
    pub steps: bool,
    /// true when no value could be recognized and the default class was used
    pub fallback: bool,
}

impl HighwayResolution {
    fn of(highway: Highway) -> HighwayResolution {
        HighwayResolution {
            highway,
            steps: false,
            fallback: false,
        }
    }
}

/// reduces the raw highway values of a way to one class of the taxonomy.
///
/// non-motorized and bus facilities are settled first: any `steps` makes a
/// footway with steps, then path, mixed foot/cycle (path), foot (footway),
/// cycleway and busway. otherwise the highest ranked recognized class wins.
/// values that match nothing fall back to [`Highway::DEFAULT`].
pub fn resolve_highway(values: &[String]) -> HighwayResolution {
    let has = |v: &str| values.iter().any(|h| h == v);
    let on_foot = has("footway") || has("pedestrian");

    if has("steps") {
        return HighwayResolution {
            highway: Highway::Footway,
            steps: true,
            fallback: false,
        };
    }
    if has("path") {
        return HighwayResolution::of(Highway::Path);
    }
    if on_foot && has("cycleway") {
        return HighwayResolution::of(Highway::Path);
    }
    if on_foot {
        return HighwayResolution::of(Highway::Footway);
    }
    if has("cycleway") {
        return HighwayResolution::of(Highway::Cycleway);
    }
    if has("busway") {
        return HighwayResolution::of(Highway::Busway);
    }

    let recognized = values
        .iter()
        .filter_map(|h| Highway::from_str(h).ok())
        .collect::<Vec<_>>();
    match Highway::top(&recognized) {
        Some(highway) => HighwayResolution::of(highway),
        None => HighwayResolution {
            highway: Highway::DEFAULT,
            steps: false,
            fallback: true,
        },
    }
}

/// class access defaults, then overridden by any explicit OSM mode tags.
pub fn resolve_access(highway: &Highway, tags: &OsmWayTags) -> ModeAccess {
    let mut access = ModeAccess::for_highway(highway);
    let tag = |value: &Option<String>| value.as_deref().and_then(parse_access_value);

    if let Some(walk) = tag(&tags.foot) {
        access.walk = walk;
    }
    if let Some(bike) = tag(&tags.bicycle) {
        access.bike = bike;
    }
    if let Some(truck) = tag(&tags.hgv) {
        access.truck = truck;
    }
    if let Some(bus) = tag(&tags.bus).or_else(|| tag(&tags.psv)) {
        access.bus = bus;
    }
    if let Some(motor) = tag(&tags.motor_vehicle) {
        access.drive = motor;
        access.truck = motor;
    }
    access
}

/// builds the standardized view of a raw edge. lanes are left for the lane resolver.
pub fn standardize_edge(edge: &RawEdge) -> StandardizedLink {
    let resolution = resolve_highway(&edge.tags.highway);
    if resolution.fallback {
        log::warn!(
            "edge ({}, {}) of way(s) {:?} has unrecognized highway tag '{}', using '{}'",
            edge.u,
            edge.v,
            edge.way_ids,
            edge.tags.highway_text(),
            resolution.highway
        );
    }
    let access = resolve_access(&resolution.highway, &edge.tags);
    StandardizedLink {
        osm_a: edge.u,
        osm_b: edge.v,
        highway: resolution.highway,
        highway_orig: edge.tags.highway_text(),
        name: edge.tags.name.clone(),
        _ref: edge.tags._ref.clone(),
        oneway: edge.oneway,
        steps: resolution.steps,
        access,
        lanes: 0,
        buslanes: 0,
        lane_source: LaneSource::Default,
        geometry: edge.geometry.clone(),
        length_meters: edge.length_meters,
        way_ids: edge.way_ids.clone(),
        county: None,
        model_link_id: None,
        a: None,
        b: None,
    }
}

/// standardizes every edge, preserving input order.
pub fn standardize_edges(edges: &[RawEdge]) -> Vec<StandardizedLink> {
    let iter = tqdm!(edges.iter(), desc = "standardize highway and access", total = edges.len());
    let links = iter.map(standardize_edge).collect::<Vec<_>>();
    eprintln!();
    links
}
