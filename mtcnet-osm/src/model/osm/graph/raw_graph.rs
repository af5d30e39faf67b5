use super::{wkt_serde, EdgeOrientation, OsmNodeId, OsmNodes, OsmWayId, OsmWayTags, OsmWays};
use crate::model::osm::OsmError;
use geo::{Haversine, Length, LineString};
use itertools::Itertools;
use kdam::tqdm;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// a node of the raw graph: a way endpoint or a node shared by more than one way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub osmid: OsmNodeId,
    pub x: f64,
    pub y: f64,
    /// number of distinct neighboring nodes, ignoring direction
    pub street_count: usize,
}

/// a segment of an OSM way between two raw graph nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    pub u: OsmNodeId,
    pub v: OsmNodeId,
    /// disambiguates parallel edges between the same (u, v)
    pub key: usize,
    pub way_ids: Vec<OsmWayId>,
    pub orientation: EdgeOrientation,
    pub oneway: bool,
    pub tags: OsmWayTags,
    #[serde(
        serialize_with = "wkt_serde::serialize_linestring",
        deserialize_with = "wkt_serde::deserialize_linestring"
    )]
    pub geometry: LineString<f64>,
    pub length_meters: f64,
}

impl RawEdge {
    pub fn new(
        u: OsmNodeId,
        v: OsmNodeId,
        way_id: OsmWayId,
        orientation: EdgeOrientation,
        oneway: bool,
        tags: OsmWayTags,
        geometry: LineString<f64>,
    ) -> RawEdge {
        let length_meters = Haversine.length(&geometry);
        RawEdge {
            u,
            v,
            key: 0,
            way_ids: vec![way_id],
            orientation,
            oneway,
            tags,
            geometry,
            length_meters,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.u == self.v
    }
}

/// the directed multigraph read from OSM, before any standardization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

impl RawGraph {
    /// builds a graph from raw edges, numbering parallel edges and deriving
    /// node street counts. nodes not touched by any edge are discarded.
    pub fn new(
        node_positions: &HashMap<OsmNodeId, (f64, f64)>,
        mut edges: Vec<RawEdge>,
    ) -> Result<RawGraph, OsmError> {
        let mut keys: HashMap<(OsmNodeId, OsmNodeId), usize> = HashMap::new();
        let mut neighbors: HashMap<OsmNodeId, HashSet<OsmNodeId>> = HashMap::new();
        for edge in edges.iter_mut() {
            let key = keys.entry((edge.u, edge.v)).or_insert(0);
            edge.key = *key;
            *key += 1;
            if edge.u != edge.v {
                neighbors.entry(edge.u).or_default().insert(edge.v);
                neighbors.entry(edge.v).or_default().insert(edge.u);
            } else {
                neighbors.entry(edge.u).or_default();
            }
        }

        let nodes = neighbors
            .iter()
            .sorted_by_key(|(id, _)| **id)
            .map(|(id, adj)| {
                let (x, y) = node_positions.get(id).ok_or_else(|| {
                    OsmError::InvalidOsmData(format!("edge references node '{id}' with no position"))
                })?;
                Ok(RawNode {
                    osmid: *id,
                    x: *x,
                    y: *y,
                    street_count: adj.len(),
                })
            })
            .collect::<Result<Vec<_>, OsmError>>()?;

        Ok(RawGraph { nodes, edges })
    }

    /// splits OSM ways into edges at every node shared by more than one way,
    /// at way endpoints, and where a way revisits one of its own nodes.
    /// two-way ways produce a forward and a reverse edge per piece.
    pub fn from_osm(nodes: &OsmNodes, ways: &OsmWays) -> Result<RawGraph, OsmError> {
        let mut usage: HashMap<OsmNodeId, usize> = HashMap::new();
        for way in ways.values() {
            for node_id in way.nodes.iter() {
                *usage.entry(*node_id).or_insert(0) += 1;
            }
            let (first, last) = way.endpoints()?;
            for endpoint in [first, last] {
                // endpoints always split, count them twice
                *usage.entry(endpoint).or_insert(0) += 1;
            }
        }

        let mut edges: Vec<RawEdge> = vec![];
        let ways_iter = tqdm!(
            ways.values().sorted_by_key(|w| w.osmid),
            total = ways.len(),
            desc = "split ways into edges"
        );
        for way in ways_iter {
            let oneway = way.tags.is_one_way();
            let mut path = way.nodes.clone();
            // reverse the node order if travel only occurs against it
            if oneway && way.tags.is_reverse() {
                path.reverse();
            }
            let mut piece: Vec<OsmNodeId> = vec![];
            for (idx, node_id) in path.iter().enumerate() {
                piece.push(*node_id);
                let is_endpoint = idx == path.len() - 1
                    || usage.get(node_id).copied().unwrap_or_default() > 1;
                if piece.len() > 1 && is_endpoint {
                    let geometry = way.piece_geometry(&piece, nodes)?;
                    let (u, v) = (piece[0], piece[piece.len() - 1]);
                    if !oneway {
                        let mut rev_geometry = geometry.clone();
                        rev_geometry.0.reverse();
                        edges.push(RawEdge::new(
                            v,
                            u,
                            way.osmid,
                            EdgeOrientation::Reverse,
                            oneway,
                            way.tags.clone(),
                            rev_geometry,
                        ));
                    }
                    edges.push(RawEdge::new(
                        u,
                        v,
                        way.osmid,
                        EdgeOrientation::Forward,
                        oneway,
                        way.tags.clone(),
                        geometry,
                    ));
                    piece = vec![*node_id];
                }
            }
        }
        eprintln!();

        let positions = nodes
            .iter()
            .map(|(id, n)| (*id, (n.x, n.y)))
            .collect::<HashMap<_, _>>();
        let graph = RawGraph::new(&positions, edges)?;
        log::info!(
            "raw graph has {} nodes and {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }
}
