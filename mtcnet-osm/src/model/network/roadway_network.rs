use super::{RoadwayError, StandardizedLink, StandardizedNode};
use crate::model::osm::graph::OsmNodeId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// the standardized roadway graph handed from the roadway pipeline to the
/// transit stitcher and the writers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadwayNetwork {
    pub nodes: Vec<StandardizedNode>,
    pub links: Vec<StandardizedLink>,
}

impl RoadwayNetwork {
    pub fn new(nodes: Vec<StandardizedNode>, links: Vec<StandardizedLink>) -> RoadwayNetwork {
        RoadwayNetwork { nodes, links }
    }

    /// drops nodes not referenced by any link. returns the number removed.
    pub fn retain_referenced_nodes(&mut self) -> usize {
        let referenced = self
            .links
            .iter()
            .flat_map(|l| [l.osm_a, l.osm_b])
            .collect::<HashSet<_>>();
        let before = self.nodes.len();
        self.nodes.retain(|n| referenced.contains(&n.osmid));
        before - self.nodes.len()
    }

    /// index from OSM node id into `nodes`
    pub fn node_index(&self) -> HashMap<OsmNodeId, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.osmid, idx))
            .collect()
    }

    /// confirms every link endpoint is a node of this network.
    pub fn validate_endpoints(&self) -> Result<(), RoadwayError> {
        let index = self.node_index();
        for link in self.links.iter() {
            for endpoint in [link.osm_a, link.osm_b] {
                if !index.contains_key(&endpoint) {
                    return Err(RoadwayError::MissingNode(
                        format!("({}, {})", link.osm_a, link.osm_b),
                        endpoint.to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
