use super::{ModelIdAllocator, ModelIdError};
use crate::model::{
    feature::{County, EntityKind, IdSpace, ModelLinkId, ModelNodeId},
    network::RoadwayNetwork,
    osm::graph::OsmNodeId,
};
use itertools::Itertools;
use std::collections::HashMap;

/// assigns model ids to the roadway network from the fixed county ranges.
///
/// within a county, nodes are numbered by ascending OSM id and links by
/// ascending (A, B) OSM ids, so identical input always yields identical ids.
#[derive(Debug, Clone, Copy)]
pub struct ModelIdAssigner;

impl ModelIdAssigner {
    /// builds the assigner after confirming no two county ranges overlap.
    pub fn new() -> Result<ModelIdAssigner, ModelIdError> {
        validate_range_table()?;
        Ok(ModelIdAssigner)
    }

    pub fn assign(&self, network: &mut RoadwayNetwork) -> Result<(), ModelIdError> {
        let mut alloc = ModelIdAllocator::new(IdSpace::Roadway);

        let node_order = network
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| {
                let county = n
                    .county
                    .ok_or_else(|| ModelIdError::MissingCounty(format!("node {}", n.osmid)))?;
                Ok((county, n.osmid, idx))
            })
            .collect::<Result<Vec<_>, ModelIdError>>()?;
        check_capacity(node_order.iter().map(|(c, _, _)| *c), EntityKind::Node)?;
        for (county, _, idx) in node_order.into_iter().sorted() {
            let id = alloc.next_id(&county, EntityKind::Node)?;
            network.nodes[idx].model_node_id = Some(ModelNodeId(id));
        }

        let node_ids = network
            .nodes
            .iter()
            .filter_map(|n| n.model_node_id.map(|id| (n.osmid, id)))
            .collect::<HashMap<OsmNodeId, ModelNodeId>>();

        let link_order = network
            .links
            .iter()
            .enumerate()
            .map(|(idx, l)| {
                let county = l.county.ok_or_else(|| {
                    ModelIdError::MissingCounty(format!("link ({}, {})", l.osm_a, l.osm_b))
                })?;
                Ok((county, l.osm_a, l.osm_b, idx))
            })
            .collect::<Result<Vec<_>, ModelIdError>>()?;
        check_capacity(link_order.iter().map(|(c, _, _, _)| *c), EntityKind::Link)?;
        for (county, a, b, idx) in link_order.into_iter().sorted() {
            let (model_a, model_b) = match (node_ids.get(&a), node_ids.get(&b)) {
                (Some(ma), Some(mb)) => (*ma, *mb),
                _ => {
                    return Err(ModelIdError::UnassignedEndpoint(a.to_string(), b.to_string()))
                }
            };
            let id = alloc.next_id(&county, EntityKind::Link)?;
            let link = &mut network.links[idx];
            link.model_link_id = Some(ModelLinkId(id));
            link.a = Some(model_a);
            link.b = Some(model_b);
        }

        log::info!(
            "assigned model ids to {} nodes and {} links",
            network.nodes.len(),
            network.links.len()
        );
        Ok(())
    }
}

/// fails before any id is issued if a county has more entities than its roadway sub-range.
fn check_capacity(
    counties: impl Iterator<Item = County>,
    kind: EntityKind,
) -> Result<(), ModelIdError> {
    for (county, count) in counties.counts() {
        let capacity = county.id_subrange(kind, IdSpace::Roadway).capacity();
        if count > capacity {
            return Err(ModelIdError::RangeExceeded {
                county,
                kind,
                count,
                capacity,
            });
        }
    }
    Ok(())
}

/// confirms the county id ranges are pairwise disjoint for both entity kinds.
pub fn validate_range_table() -> Result<(), ModelIdError> {
    for kind in [EntityKind::Node, EntityKind::Link] {
        for (a, b) in County::all().tuple_combinations() {
            let (range_a, range_b) = (a.id_range(kind), b.id_range(kind));
            if range_a.overlaps(&range_b) {
                return Err(ModelIdError::OverlappingRanges {
                    kind,
                    a,
                    range_a,
                    b,
                    range_b,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_capacity, ModelIdAssigner};
    use crate::model::{
        feature::{County, EntityKind, Highway, IdSpace},
        network::{standardized_link::tests::link, RoadwayNetwork, StandardizedNode},
        osm::graph::OsmNodeId,
    };
    use std::collections::HashSet;

    fn node(id: i64, county: County) -> StandardizedNode {
        StandardizedNode {
            osmid: OsmNodeId(id),
            x: -122.4,
            y: 37.7,
            street_count: 2,
            county: Some(county),
            model_node_id: None,
        }
    }

    fn network() -> RoadwayNetwork {
        let nodes = vec![
            node(30, County::SanFrancisco),
            node(10, County::SanFrancisco),
            node(20, County::SanMateo),
            node(40, County::External),
        ];
        let mut links = vec![
            link(30, 10, Highway::Primary, 2, 0),
            link(10, 30, Highway::Primary, 2, 0),
            link(10, 20, Highway::Secondary, 1, 0),
            link(20, 40, Highway::Trunk, 2, 0),
        ];
        let counties = [
            County::SanFrancisco,
            County::SanFrancisco,
            County::SanMateo,
            County::External,
        ];
        for (l, c) in links.iter_mut().zip(counties) {
            l.county = Some(c);
        }
        RoadwayNetwork::new(nodes, links)
    }

    fn assigned() -> RoadwayNetwork {
        let mut net = network();
        let result = ModelIdAssigner::new().and_then(|a| a.assign(&mut net));
        match result {
            Ok(()) => net,
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_ids_follow_osm_order_within_county_ranges() {
        let net = assigned();
        let ids = net
            .nodes
            .iter()
            .map(|n| (n.osmid.0, n.model_node_id.map(|id| id.0)))
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                (30, Some(1_000_001)),
                (10, Some(1_000_000)),
                (20, Some(1_500_000)),
                (40, Some(900_001)),
            ]
        );
        let link_ids = net
            .links
            .iter()
            .map(|l| l.model_link_id.map(|id| id.0))
            .collect::<Vec<_>>();
        assert_eq!(
            link_ids,
            vec![Some(1_000_001), Some(1_000_000), Some(2_000_000), Some(0)]
        );
        assert_eq!(net.links[0].shape_id().as_deref(), Some("sh1000001"));
        assert_eq!(
            (net.links[2].a.map(|a| a.0), net.links[2].b.map(|b| b.0)),
            (Some(1_000_000), Some(1_500_000))
        );
    }

    #[test]
    fn test_ids_are_unique_in_range_and_deterministic() {
        let first = assigned();
        let second = assigned();
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.links, second.links);

        let mut seen = HashSet::new();
        for n in first.nodes.iter() {
            let (county, id) = match (n.county, n.model_node_id) {
                (Some(c), Some(id)) => (c, id.0),
                _ => panic!("node {} not assigned", n.osmid),
            };
            assert!(county.id_range(EntityKind::Node).contains(id));
            assert!(seen.insert(id));
        }
        let mut seen = HashSet::new();
        for l in first.links.iter() {
            let (county, id) = match (l.county, l.model_link_id) {
                (Some(c), Some(id)) => (c, id.0),
                _ => panic!("link not assigned"),
            };
            assert!(county.id_range(EntityKind::Link).contains(id));
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn test_overflow_is_fatal() {
        let capacity = County::Napa
            .id_subrange(EntityKind::Node, IdSpace::Roadway)
            .capacity();
        let counties = std::iter::repeat(County::Napa).take(capacity + 1);
        match check_capacity(counties, EntityKind::Node) {
            Ok(()) => panic!("expected overflow"),
            Err(e) => assert!(e.to_string().contains("county Napa exceeded allocated node ID range")),
        }
    }

    #[test]
    fn test_missing_endpoint_is_fatal() {
        let mut net = network();
        net.nodes.retain(|n| n.osmid != OsmNodeId(40));
        let result = ModelIdAssigner::new().and_then(|a| a.assign(&mut net));
        assert!(result.is_err());
    }
}
