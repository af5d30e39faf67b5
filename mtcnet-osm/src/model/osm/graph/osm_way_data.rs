use super::{OsmNodeId, OsmNodes, OsmWayId, OsmWayTags};
use crate::model::osm::OsmError;
use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

/// the node path and tags of an OSM way.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct OsmWayData {
    pub osmid: OsmWayId,
    /// node path with consecutive repeats collapsed
    pub nodes: Vec<OsmNodeId>,
    pub tags: OsmWayTags,
}

impl OsmWayData {
    pub fn new(way: &osmpbf::elements::Way) -> OsmWayData {
        let mut nodes = way.refs().map(OsmNodeId).collect::<Vec<_>>();
        nodes.dedup();
        OsmWayData {
            osmid: OsmWayId(way.id()),
            nodes,
            tags: OsmWayTags::new(way.tags()),
        }
    }

    /// first and last node of the path
    pub fn endpoints(&self) -> Result<(OsmNodeId, OsmNodeId), OsmError> {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => Ok((*first, *last)),
            _ => Err(OsmError::InvalidOsmData(format!(
                "way {} has an empty node path",
                self.osmid
            ))),
        }
    }

    /// polyline through a run of this way's nodes
    pub fn piece_geometry(
        &self,
        piece: &[OsmNodeId],
        nodes: &OsmNodes,
    ) -> Result<LineString<f64>, OsmError> {
        piece
            .iter()
            .map(|id| {
                nodes
                    .get(id)
                    .map(|n| Coord { x: n.x, y: n.y })
                    .ok_or_else(|| {
                        OsmError::InvalidOsmData(format!(
                            "way {} references node {id} which was not read",
                            self.osmid
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(LineString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::OsmWayData;
    use crate::model::osm::graph::{OsmNodeData, OsmNodeId, OsmNodes, OsmWayId, OsmWayTags};

    #[test]
    fn test_piece_geometry_requires_every_node() {
        let way = OsmWayData {
            osmid: OsmWayId(7),
            nodes: vec![OsmNodeId(1), OsmNodeId(2)],
            tags: OsmWayTags::default(),
        };
        let mut nodes = OsmNodes::new();
        nodes.insert(OsmNodeId(1), OsmNodeData::new(OsmNodeId(1), -122.4, 37.7));
        assert!(way.piece_geometry(&way.nodes, &nodes).is_err());
        nodes.insert(OsmNodeId(2), OsmNodeData::new(OsmNodeId(2), -122.3, 37.7));
        match way.piece_geometry(&way.nodes, &nodes) {
            Ok(line) => assert_eq!(line.0.len(), 2),
            Err(e) => panic!("{e}"),
        }
        assert!(matches!(way.endpoints(), Ok((OsmNodeId(1), OsmNodeId(2)))));
    }
}
