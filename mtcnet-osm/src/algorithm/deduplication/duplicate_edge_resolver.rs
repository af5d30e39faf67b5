use crate::model::{
    feature::Highway,
    network::{LaneSource, StandardizedLink},
    osm::graph::OsmWayId,
};
use itertools::Itertools;
use kdam::tqdm;
use std::collections::HashSet;

/// collapses links sharing an ordered (A, B) pair into one link per pair.
///
/// output is ordered by (A, B). links that are already unique pass through unchanged.
pub fn resolve_duplicates(links: Vec<StandardizedLink>) -> Vec<StandardizedLink> {
    let n_input = links.len();
    let mut sorted = links;
    sorted.sort_by_key(|l| l.endpoints());
    let groups = sorted
        .into_iter()
        .chunk_by(|l| l.endpoints())
        .into_iter()
        .map(|(_, group)| group.collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let n_groups = groups.len();
    let groups_iter = tqdm!(groups.into_iter(), desc = "resolve duplicate edges", total = n_groups);
    let result = groups_iter.filter_map(merge_candidates).collect::<Vec<_>>();
    eprintln!();
    if result.len() < n_input {
        log::info!(
            "merged {} parallel links into {} distinct (A, B) links",
            n_input,
            result.len()
        );
    }
    result
}

/// merges all candidates of a single (A, B) pair. None only for an empty input.
pub fn merge_candidates(candidates: Vec<StandardizedLink>) -> Option<StandardizedLink> {
    if candidates.len() < 2 {
        return candidates.into_iter().next();
    }
    // min_by_key returns the first of equal minimums
    let survivor_idx = candidates
        .iter()
        .enumerate()
        .min_by_key(|(_, l)| l.highway.priority())
        .map(|(idx, _)| idx)?;
    let survivor_name = candidates[survivor_idx].name.clone().unwrap_or_default();

    let contributors = candidates
        .iter()
        .filter(|l| {
            let name = l.name.as_deref().unwrap_or_default();
            l.highway == Highway::Busway || name.is_empty() || name == survivor_name
        })
        .collect::<Vec<_>>();

    let mut general: Option<u32> = None;
    let mut bus: u32 = 0;
    for group in way_groups(&contributors) {
        let group_general = group
            .iter()
            .filter(|l| l.lane_source == LaneSource::Tagged)
            .map(|l| l.lanes)
            .max();
        if let Some(g) = group_general {
            general = Some(general.unwrap_or_default() + g);
        }
        bus += group.iter().map(|l| l.buslanes).max().unwrap_or_default();
    }

    let way_ids = candidates
        .iter()
        .flat_map(|l| l.way_ids.iter().copied())
        .sorted()
        .dedup()
        .collect::<Vec<OsmWayId>>();

    let mut merged = candidates.into_iter().nth(survivor_idx)?;
    if let Some(lanes) = general {
        merged.lanes = lanes;
        merged.lane_source = LaneSource::Tagged;
    }
    merged.buslanes = bus;
    if bus > 0 {
        merged.access.bus = true;
    }
    merged.way_ids = way_ids;
    Some(merged)
}

/// partitions links into groups connected through shared OSM way ids.
fn way_groups<'a>(links: &[&'a StandardizedLink]) -> Vec<Vec<&'a StandardizedLink>> {
    let mut groups: Vec<(HashSet<OsmWayId>, Vec<&'a StandardizedLink>)> = vec![];
    for link in links.iter() {
        let ids = link.way_ids.iter().copied().collect::<HashSet<_>>();
        let (connected, mut rest): (Vec<_>, Vec<_>) = groups
            .into_iter()
            .partition(|(group_ids, _)| !group_ids.is_disjoint(&ids));
        let mut merged_ids = ids;
        let mut merged_links = vec![];
        for (group_ids, group_links) in connected {
            merged_ids.extend(group_ids);
            merged_links.extend(group_links);
        }
        merged_links.push(*link);
        rest.push((merged_ids, merged_links));
        groups = rest;
    }
    groups.into_iter().map(|(_, links)| links).collect()
}

#[cfg(test)]
mod tests {
    use super::{merge_candidates, resolve_duplicates};
    use crate::model::{
        feature::Highway,
        network::{standardized_link::tests::link, LaneSource},
        osm::graph::OsmWayId,
    };

    #[test]
    fn test_complementary_lanes_are_summed() {
        // general lanes and a bus lane tagged on separate ways of one corridor
        let general = link(1, 2, Highway::Primary, 2, 0);
        let mut bus = link(1, 2, Highway::Primary, 2, 1);
        bus.lane_source = LaneSource::ClassMode;
        bus.way_ids = vec![OsmWayId(77)];
        let merged = resolve_duplicates(vec![general, bus]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].highway, Highway::Primary);
        assert_eq!((merged[0].lanes, merged[0].buslanes), (2, 1));
        assert!(merged[0].access.bus);
        assert_eq!(merged[0].way_ids, vec![OsmWayId(77), OsmWayId(102)]);
    }

    #[test]
    fn test_redundant_tags_use_max() {
        // both records come from way 102
        let a = link(1, 2, Highway::Secondary, 2, 0);
        let b = link(1, 2, Highway::Secondary, 3, 0);
        let merged = merge_candidates(vec![a, b]);
        assert_eq!(merged.map(|l| l.lanes), Some(3));
    }

    #[test]
    fn test_shared_way_ids_are_transitive() {
        let mut a = link(1, 2, Highway::Tertiary, 1, 0);
        a.way_ids = vec![OsmWayId(1)];
        let mut b = link(1, 2, Highway::Tertiary, 2, 0);
        b.way_ids = vec![OsmWayId(2)];
        let mut c = link(1, 2, Highway::Tertiary, 1, 0);
        c.way_ids = vec![OsmWayId(1), OsmWayId(2)];
        let merged = merge_candidates(vec![a, b, c]);
        assert_eq!(merged.map(|l| l.lanes), Some(2));
    }

    #[test]
    fn test_survivor_is_highest_rank_then_first() {
        let mut service = link(1, 2, Highway::Service, 1, 0);
        service.way_ids = vec![OsmWayId(5)];
        let mut primary = link(1, 2, Highway::Primary, 2, 0);
        primary.name = Some(String::from("Mission Street"));
        let merged = merge_candidates(vec![service, primary]);
        match merged {
            Some(l) => {
                assert_eq!(l.highway, Highway::Primary);
                assert_eq!(l.name.as_deref(), Some("Mission Street"));
                // the unnamed service road still contributes
                assert_eq!(l.lanes, 3);
            }
            None => panic!("expected a merged link"),
        }

        let mut first = link(1, 2, Highway::Residential, 1, 0);
        first.name = Some(String::from("First"));
        let mut second = link(1, 2, Highway::Residential, 1, 0);
        second.name = Some(String::from("Second"));
        second.way_ids = vec![OsmWayId(3)];
        let merged = merge_candidates(vec![first, second]);
        assert_eq!(merged.and_then(|l| l.name), Some(String::from("First")));
    }

    #[test]
    fn test_differently_named_links_do_not_contribute() {
        let mut main = link(1, 2, Highway::Primary, 2, 0);
        main.name = Some(String::from("El Camino Real"));
        let mut other = link(1, 2, Highway::Primary, 3, 0);
        other.name = Some(String::from("Frontage Road"));
        other.way_ids = vec![OsmWayId(8)];
        let merged = merge_candidates(vec![main, other]);
        match merged {
            Some(l) => {
                assert_eq!(l.lanes, 2);
                assert_eq!(l.way_ids.len(), 2);
            }
            None => panic!("expected a merged link"),
        }
    }

    #[test]
    fn test_untagged_candidates_keep_survivor_fill() {
        let mut a = link(1, 2, Highway::Residential, 1, 0);
        a.lane_source = LaneSource::ClassMode;
        let mut b = link(1, 2, Highway::Residential, 1, 0);
        b.lane_source = LaneSource::ClassMode;
        b.way_ids = vec![OsmWayId(4)];
        let merged = merge_candidates(vec![a, b]);
        match merged {
            Some(l) => assert_eq!((l.lanes, l.lane_source), (1, LaneSource::ClassMode)),
            None => panic!("expected a merged link"),
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut bus = link(1, 2, Highway::Busway, 0, 1);
        bus.way_ids = vec![OsmWayId(9)];
        let links = vec![
            link(1, 2, Highway::Primary, 2, 0),
            bus,
            link(2, 3, Highway::Residential, 1, 0),
            link(3, 2, Highway::Residential, 1, 0),
        ];
        let once = resolve_duplicates(links);
        assert_eq!(once.len(), 3);
        let twice = resolve_duplicates(once.clone());
        assert_eq!(once, twice);
    }
}
