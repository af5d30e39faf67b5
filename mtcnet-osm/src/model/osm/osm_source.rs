use super::{
    graph::{ElementFilter, RawGraph},
    import_ops, OsmError,
};
use geo::{BoundingRect, Coord, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};

/// where the raw roadway graph comes from.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OsmSource {
    Pbf {
        pbf_filepath: String,
        network_filter: Option<ElementFilter>,
        /// study area polygons. nodes outside their buffered bounding box are not read.
        extent: Option<MultiPolygon<f64>>,
    },
}

impl OsmSource {
    pub fn import(&self) -> Result<RawGraph, OsmError> {
        match self {
            OsmSource::Pbf {
                pbf_filepath,
                network_filter,
                extent,
            } => {
                let net_ftr = network_filter.clone().unwrap_or_default();
                let extent_opt = extent.as_ref().and_then(buffered_extent);

                eprintln!();
                log::info!("  (((1))) reading PBF source");
                let (nodes, ways) = import_ops::read_pbf(pbf_filepath, &net_ftr, extent_opt.as_ref())?;

                eprintln!();
                log::info!("  (((2))) splitting ways into raw graph edges");
                let graph = RawGraph::from_osm(&nodes, &ways)?;
                if graph.edges.is_empty() {
                    return Err(OsmError::EmptyGraph);
                }

                log::info!(
                    "loaded PBF-sourced raw graph with {} nodes, {} edges",
                    graph.nodes.len(),
                    graph.edges.len()
                );
                Ok(graph)
            }
        }
    }
}

/// bounding box of the extent, grown by roughly 500 meters on each side.
fn buffered_extent(extent: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    let rect = extent.bounding_rect()?;
    let buf = import_ops::BUFFER_500M_IN_DEGREES;
    let min = Coord {
        x: rect.min().x - buf,
        y: rect.min().y - buf,
    };
    let max = Coord {
        x: rect.max().x + buf,
        y: rect.max().y + buf,
    };
    Some(Rect::new(min, max))
}

#[cfg(test)]
mod tests {
    use super::buffered_extent;
    use geo::{polygon, Contains, MultiPolygon, Point};

    #[test]
    fn test_buffered_extent_contains_nearby_points() {
        let square = polygon![
            (x: -122.5, y: 37.7),
            (x: -122.4, y: 37.7),
            (x: -122.4, y: 37.8),
            (x: -122.5, y: 37.8),
        ];
        let extent = MultiPolygon::new(vec![square]);
        match buffered_extent(&extent) {
            Some(rect) => {
                assert!(rect.contains(&Point::new(-122.402, 37.801)));
                assert!(!rect.contains(&Point::new(-122.3, 37.75)));
            }
            None => panic!("expected an extent"),
        }
    }
}
