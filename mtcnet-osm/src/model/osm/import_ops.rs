use super::{
    graph::{ElementFilter, OsmNodeData, OsmNodeId, OsmNodes, OsmWayData, OsmWays},
    OsmError,
};
use geo::{Contains, Rect};
use kdam::{term, tqdm, Bar, BarExt};
use osmpbf::{Element, ElementReader};
use std::{collections::HashSet, path::Path};

/// approximately 500 meters in degrees at Bay Area latitudes
pub const BUFFER_500M_IN_DEGREES: f64 = 0.0045;

/// reads the nodes and the roadway ways of a .pbf file.
/// - ways are kept when the [`ElementFilter`] accepts their tags
/// - nodes are kept when they fall inside the extent, if one is given
/// - ways referencing a node outside the extent are dropped, and then the
///   nodes no longer used by any kept way
pub fn read_pbf(
    filepath: &str,
    filter: &ElementFilter,
    extent: Option<&Rect<f64>>,
) -> Result<(OsmNodes, OsmWays), OsmError> {
    let fp = Path::new(filepath);
    if !fp.is_file() {
        return Err(OsmError::MissingPbfFile(filepath.to_string()));
    }
    let reader = ElementReader::from_path(fp)?;
    let in_extent = |n: &OsmNodeData| extent.map_or(true, |r| r.contains(&n.get_point()));

    term::hide_cursor().map_err(|e| OsmError::ProgressBarError(e.to_string()))?;
    let mut bar = Bar::builder()
        .desc(filepath)
        .position(0)
        .unit(" elements")
        .unit_scale(true)
        .build()
        .map_err(OsmError::ProgressBarError)?;

    let mut nodes = OsmNodes::new();
    let mut ways = OsmWays::new();
    reader.for_each(|element| {
        let accepted = filter.accept(&element);
        let node = match &element {
            Element::Node(n) => Some(OsmNodeData::from(n)),
            Element::DenseNode(n) => Some(OsmNodeData::from(n)),
            _ => None,
        };
        match (node, &element) {
            (Some(n), _) if accepted && in_extent(&n) => {
                nodes.insert(n.osmid, n);
            }
            (None, Element::Way(way)) if accepted => {
                let w = OsmWayData::new(way);
                if w.nodes.is_empty() {
                    log::debug!("way {} has no nodes, skipping", w.osmid);
                } else if let Some(prev) = ways.insert(w.osmid, w) {
                    log::warn!("way {} appears more than once in {filepath}", prev.osmid);
                }
            }
            _ => {}
        }
        let _ = bar.update(1);
    })?;
    eprintln!();
    term::show_cursor().map_err(|e| OsmError::ProgressBarError(e.to_string()))?;

    if nodes.is_empty() {
        return Err(OsmError::NoNodesInExtent);
    }
    let dropped = retain_connected_ways(&mut nodes, &mut ways);
    if ways.is_empty() {
        return Err(OsmError::NoWaysInExtent);
    }
    log::info!(
        "read {} ways and {} nodes from {filepath}, {dropped} ways dropped at the extent boundary",
        ways.len(),
        nodes.len()
    );
    Ok((nodes, ways))
}

/// drops ways that reference a node missing from `nodes`, then the nodes not
/// referenced by any remaining way. returns the number of ways dropped.
pub fn retain_connected_ways(nodes: &mut OsmNodes, ways: &mut OsmWays) -> usize {
    let before = ways.len();
    let ways_iter = tqdm!(
        ways.values(),
        desc = "check way connectivity",
        total = ways.len()
    );
    let disconnected = ways_iter
        .filter(|w| w.nodes.iter().any(|id| !nodes.contains_key(id)))
        .map(|w| w.osmid)
        .collect::<Vec<_>>();
    eprintln!();
    for way_id in disconnected.iter() {
        ways.remove(way_id);
    }
    let used = ways
        .values()
        .flat_map(|w| w.nodes.iter().copied())
        .collect::<HashSet<OsmNodeId>>();
    nodes.retain(|id, _| used.contains(id));
    before - ways.len()
}

#[cfg(test)]
mod tests {
    use super::retain_connected_ways;
    use crate::model::osm::graph::{
        OsmNodeData, OsmNodeId, OsmNodes, OsmWayData, OsmWayId, OsmWayTags, OsmWays,
    };

    fn way(id: i64, node_ids: &[i64]) -> (OsmWayId, OsmWayData) {
        let data = OsmWayData {
            osmid: OsmWayId(id),
            nodes: node_ids.iter().map(|n| OsmNodeId(*n)).collect(),
            tags: OsmWayTags::from_pairs(&[("highway", "residential")]),
        };
        (OsmWayId(id), data)
    }

    #[test]
    fn test_ways_leaving_the_extent_are_dropped() {
        // node 4 was outside the extent and never read
        let mut nodes: OsmNodes = [1, 2, 3, 5]
            .iter()
            .map(|id| (OsmNodeId(*id), OsmNodeData::new(OsmNodeId(*id), 0.0, 0.0)))
            .collect();
        let mut ways: OsmWays = [way(10, &[1, 2]), way(11, &[2, 3, 4])].into_iter().collect();
        let dropped = retain_connected_ways(&mut nodes, &mut ways);
        assert_eq!(dropped, 1);
        assert!(ways.contains_key(&OsmWayId(10)));
        let mut kept = nodes.keys().map(|id| id.0).collect::<Vec<_>>();
        kept.sort();
        // 3 was only used by the dropped way, 5 by no way at all
        assert_eq!(kept, vec![1, 2]);
    }
}
