use super::LaneFillLookup;
use crate::model::{
    feature::Highway,
    network::{LaneSource, RoadwayError, StandardizedLink},
    osm::graph::{EdgeOrientation, OsmWayTags, RawEdge},
};

/// lane counts read from the tags of one raw edge, before any fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaggedLanes {
    /// general traffic lanes with bus lanes removed
    pub general: Option<u32>,
    pub bus: Option<u32>,
}

/// parses an OSM lane value. lists are `;` separated; two values yield the
/// minimum and longer lists the median. decimals are truncated, negative and
/// non-numeric entries are dropped.
pub fn parse_lane_count(value: &str) -> Option<u32> {
    let mut counts = value
        .split(OsmWayTags::OSM_VALUE_SEPARATOR)
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .collect::<Vec<_>>();
    counts.sort_by(|a, b| a.total_cmp(b));
    let n = counts.len();
    let value = match n {
        0 => return None,
        1 => counts[0],
        2 => counts[0],
        _ if n % 2 == 1 => counts[n / 2],
        _ => (counts[n / 2 - 1] + counts[n / 2]) / 2.0,
    };
    Some(value.trunc() as u32)
}

/// share of a two-way total assigned to one direction
fn per_direction(total: u32, oneway: bool) -> u32 {
    if oneway || total == 0 {
        total
    } else {
        (total / 2).max(1)
    }
}

/// resolves a count from the directional, shared and total tags for one edge.
fn directional_count(
    orientation: EdgeOrientation,
    oneway: bool,
    forward: Option<u32>,
    backward: Option<u32>,
    both_ways: Option<u32>,
    total: Option<u32>,
) -> Option<u32> {
    let from_total = || total.map(|n| per_direction(n, oneway));
    match orientation {
        EdgeOrientation::Forward => forward.or(both_ways).or_else(from_total),
        EdgeOrientation::Reverse => backward.or(both_ways).or_else(from_total),
        EdgeOrientation::Both => {
            let parts = [forward, backward, both_ways];
            if parts.iter().any(Option::is_some) {
                Some(parts.iter().flatten().sum())
            } else {
                total
            }
        }
    }
}

/// reads the general and bus lane counts of a raw edge. bus lanes are taken out
/// of the general count of the same record.
pub fn tagged_lanes(edge: &RawEdge) -> TaggedLanes {
    let t = &edge.tags;
    let parse = |v: &Option<String>| v.as_deref().and_then(parse_lane_count);
    let bus = directional_count(
        edge.orientation,
        edge.oneway,
        parse(&t.lanes_bus_forward),
        parse(&t.lanes_bus_backward),
        None,
        parse(&t.lanes_bus),
    );
    let general = directional_count(
        edge.orientation,
        edge.oneway,
        parse(&t.lanes_forward),
        parse(&t.lanes_backward),
        parse(&t.lanes_both_ways),
        parse(&t.lanes),
    )
    .map(|n| n.saturating_sub(bus.unwrap_or_default()));
    TaggedLanes { general, bus }
}

/// assigns `lanes`, `buslanes` and `lane_source` to every link from the raw
/// edge at the same position.
///
/// busways carry no general lanes and at least one bus lane. path, footway and
/// cycleway carry no general lanes. other links without lane tags take the most
/// common tagged count of their class, or `default_lanes`.
pub fn resolve_lanes(
    links: &mut [StandardizedLink],
    edges: &[RawEdge],
    default_lanes: u32,
) -> Result<(), RoadwayError> {
    if links.len() != edges.len() {
        return Err(RoadwayError::BuildError(format!(
            "lane resolution expects one raw edge per link, found {} links and {} edges",
            links.len(),
            edges.len()
        )));
    }
    let tagged = edges.iter().map(tagged_lanes).collect::<Vec<_>>();
    let lookup = LaneFillLookup::new(links.iter().zip(tagged.iter()).map(|(l, t)| {
        let observed = match l.highway {
            h if h.is_motorized() && h != Highway::Busway => t.general,
            _ => None,
        };
        (l.highway, observed)
    }));

    let (mut n_mode, mut n_default) = (0, 0);
    for (link, t) in links.iter_mut().zip(tagged.iter()) {
        link.buslanes = t.bus.unwrap_or_default();
        match (link.highway, t.general) {
            (Highway::Busway, _) => {
                link.lanes = 0;
                link.buslanes = t.bus.unwrap_or(1);
                link.lane_source = LaneSource::Default;
            }
            (h, _) if !h.is_motorized() => {
                link.lanes = 0;
                link.lane_source = LaneSource::Default;
            }
            (_, Some(lanes)) => {
                link.lanes = lanes;
                link.lane_source = LaneSource::Tagged;
            }
            (h, None) => match lookup.get(&h) {
                Some(lanes) => {
                    link.lanes = lanes;
                    link.lane_source = LaneSource::ClassMode;
                    n_mode += 1;
                }
                None => {
                    link.lanes = default_lanes;
                    link.lane_source = LaneSource::Default;
                    n_default += 1;
                }
            },
        }
    }
    if n_mode + n_default > 0 {
        log::warn!(
            "{} links had no lane tags: {} filled by class mode, {} set to default of {}",
            n_mode + n_default,
            n_mode,
            n_default,
            default_lanes
        );
    }
    Ok(())
}
