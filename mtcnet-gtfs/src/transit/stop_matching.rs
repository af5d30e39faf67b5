use geo::{line_string, Haversine, Length, LineString, Point};
use mtcnet_osm::model::network::RoadwayNetwork;
use rstar::{primitives::GeomWithData, RTree};
use std::collections::HashSet;
use uom::si::{
    f64::Length as UomLength,
    length::{foot, meter},
};

const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

type IndexedNode = GeomWithData<[f64; 2], usize>;

/// a roadway node found near a stop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMatch {
    /// index into the network's node list
    pub node_index: usize,
    pub distance_feet: f64,
}

/// spatial index over the roadway nodes a transit rider can reach, that is the
/// endpoints of walk- or bus-accessible links. coordinates are projected to a
/// local equirectangular plane in feet centered on the indexed nodes.
pub struct StopMatcher {
    rtree: RTree<IndexedNode>,
    origin: Point<f64>,
}

impl StopMatcher {
    pub fn new(network: &RoadwayNetwork) -> StopMatcher {
        let index = network.node_index();
        let eligible = network
            .links
            .iter()
            .filter(|l| l.access.walk || l.access.bus)
            .flat_map(|l| [l.osm_a, l.osm_b])
            .filter_map(|id| index.get(&id).copied())
            .collect::<HashSet<_>>();
        let origin = match eligible.len() {
            0 => Point::new(0.0, 0.0),
            n => {
                let (sx, sy) = eligible.iter().fold((0.0, 0.0), |(sx, sy), idx| {
                    (sx + network.nodes[*idx].x, sy + network.nodes[*idx].y)
                });
                Point::new(sx / n as f64, sy / n as f64)
            }
        };
        let rows = eligible
            .into_iter()
            .map(|idx| GeomWithData::new(project(&origin, &network.nodes[idx].get_point()), idx))
            .collect::<Vec<_>>();
        log::debug!("stop matcher indexed {} roadway nodes", rows.len());
        StopMatcher {
            rtree: RTree::bulk_load(rows),
            origin,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// the closest indexed node regardless of distance
    pub fn nearest(&self, point: &Point<f64>) -> Option<NodeMatch> {
        self.rtree
            .nearest_neighbor_iter_with_distance_2(&project(&self.origin, point))
            .next()
            .map(|(row, d2)| NodeMatch {
                node_index: row.data,
                distance_feet: d2.sqrt(),
            })
    }

    /// up to `k` indexed nodes within the radius, nearest first. ties in
    /// distance are ordered by node index.
    pub fn nearest_within(&self, point: &Point<f64>, radius_feet: f64, k: usize) -> Vec<NodeMatch> {
        let mut matches = self
            .rtree
            .nearest_neighbor_iter_with_distance_2(&project(&self.origin, point))
            .take_while(|(_, d2)| d2.sqrt() <= radius_feet)
            .map(|(row, d2)| NodeMatch {
                node_index: row.data,
                distance_feet: d2.sqrt(),
            })
            .collect::<Vec<_>>();
        matches.sort_by(|a, b| {
            a.distance_feet
                .total_cmp(&b.distance_feet)
                .then(a.node_index.cmp(&b.node_index))
        });
        matches.truncate(k);
        matches
    }
}

/// equirectangular projection of a lon/lat point into feet about the origin
fn project(origin: &Point<f64>, point: &Point<f64>) -> [f64; 2] {
    let x_m = EARTH_RADIUS_METERS
        * (point.x() - origin.x()).to_radians()
        * origin.y().to_radians().cos();
    let y_m = EARTH_RADIUS_METERS * (point.y() - origin.y()).to_radians();
    [to_feet(x_m), to_feet(y_m)]
}

fn to_feet(meters: f64) -> f64 {
    UomLength::new::<meter>(meters).get::<foot>()
}

pub fn compute_haversine(src_point: Point<f64>, dst_point: Point<f64>) -> UomLength {
    let line: LineString<f64> = line_string![src_point.0, dst_point.0];
    UomLength::new::<meter>(Haversine.length(&line))
}
