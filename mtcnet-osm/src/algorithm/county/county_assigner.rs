use super::{CountyBoundaries, CountyError};
use crate::model::{
    feature::{County, Geography},
    network::RoadwayNetwork,
    osm::graph::OsmNodeId,
};
use geo::{BooleanOps, Haversine, Intersects, Length, LineString, MultiLineString, Point};
use kdam::tqdm;
use std::collections::HashMap;

/// overlap lengths closer than this (meters) are treated as equal
const OVERLAP_TOLERANCE_METERS: f64 = 0.1;

/// joins nodes and links to counties.
pub enum CountyAssigner<'a> {
    /// spatial join against county polygons
    Spatial(&'a CountyBoundaries),
    /// everything belongs to the county of a single-county run
    RunCounty(County),
}

impl<'a> CountyAssigner<'a> {
    /// picks the join for a run. a regional run cannot proceed without boundaries.
    pub fn new(
        geography: &Geography,
        boundaries: Option<&'a CountyBoundaries>,
    ) -> Result<CountyAssigner<'a>, CountyError> {
        match (boundaries, geography) {
            (Some(b), _) => Ok(CountyAssigner::Spatial(b)),
            (None, Geography::County(c)) => Ok(CountyAssigner::RunCounty(*c)),
            (None, Geography::BayArea) => {
                Err(CountyError::BoundariesRequired(geography.to_string()))
            }
        }
    }

    /// the first county in range order covering the point, else External. a
    /// point on a shared border goes to the earlier county.
    pub fn node_county(&self, point: &Point<f64>) -> County {
        match self {
            CountyAssigner::RunCounty(c) => *c,
            CountyAssigner::Spatial(boundaries) => boundaries
                .boundaries
                .iter()
                .find(|b| b.bbox.intersects(point) && b.geometry.intersects(point))
                .map(|b| b.county)
                .unwrap_or(County::External),
        }
    }

    /// the county with the longest share of the line. ties go to the county of
    /// the first endpoint, then to range order.
    pub fn link_county(&self, line: &LineString<f64>, first_endpoint: Option<County>) -> County {
        let boundaries = match self {
            CountyAssigner::RunCounty(c) => return *c,
            CountyAssigner::Spatial(b) => b,
        };
        let candidates = boundaries
            .boundaries
            .iter()
            .filter(|b| b.bbox.intersects(line) && b.geometry.intersects(line))
            .collect::<Vec<_>>();
        match candidates.as_slice() {
            [] => County::External,
            [only] => only.county,
            many => {
                let mls = MultiLineString::new(vec![line.clone()]);
                let overlaps = many
                    .iter()
                    .map(|b| {
                        let clipped = b.geometry.clip(&mls, false);
                        let meters: f64 = clipped.0.iter().map(|l| Haversine.length(l)).sum();
                        (b.county, meters)
                    })
                    .collect::<Vec<_>>();
                let longest = overlaps.iter().map(|(_, m)| *m).fold(0.0, f64::max);
                let tied = overlaps
                    .iter()
                    .filter(|(_, m)| longest - m <= OVERLAP_TOLERANCE_METERS)
                    .map(|(c, _)| *c)
                    .collect::<Vec<_>>();
                match first_endpoint {
                    Some(c) if tied.contains(&c) => c,
                    _ => tied.first().copied().unwrap_or(County::External),
                }
            }
        }
    }

    /// sets the county of every node and link of the network.
    pub fn assign(&self, network: &mut RoadwayNetwork) {
        let n_nodes = network.nodes.len();
        let nodes_iter = tqdm!(
            network.nodes.iter_mut(),
            desc = "assign node counties",
            total = n_nodes
        );
        for node in nodes_iter {
            node.county = Some(self.node_county(&node.get_point()));
        }
        eprintln!();

        let node_counties = network
            .nodes
            .iter()
            .filter_map(|n| n.county.map(|c| (n.osmid, c)))
            .collect::<HashMap<OsmNodeId, County>>();
        let n_links = network.links.len();
        let links_iter = tqdm!(network.links.iter_mut(), desc = "assign link counties", total = n_links);
        for link in links_iter {
            let first = node_counties.get(&link.osm_a).copied();
            link.county = Some(self.link_county(&link.geometry, first));
        }
        eprintln!();

        let n_external_nodes = network
            .nodes
            .iter()
            .filter(|n| n.county == Some(County::External))
            .count();
        let n_external_links = network
            .links
            .iter()
            .filter(|l| l.county == Some(County::External))
            .count();
        if n_external_nodes + n_external_links > 0 {
            log::info!(
                "{n_external_nodes} nodes and {n_external_links} links lie outside of all county boundaries"
            );
        }
    }

    /// drops links that do not touch the hull of the geography. single-county
    /// runs without boundaries have nothing to clip against, and neither do
    /// runs whose boundaries were all rejected as malformed.
    pub fn clip_to_region(&self, network: &mut RoadwayNetwork, geography: &Geography) -> usize {
        let boundaries = match self {
            CountyAssigner::RunCounty(_) => return 0,
            CountyAssigner::Spatial(b) => b,
        };
        let hull = match boundaries.region_hull(geography) {
            Ok(hull) => hull,
            Err(e) => {
                log::warn!("{e}, links are not clipped and fall back to {}", County::External);
                return 0;
            }
        };
        let before = network.links.len();
        network.links.retain(|l| hull.intersects(&l.geometry));
        let removed = before - network.links.len();
        if removed > 0 {
            log::info!("clipped {removed} links outside of {geography}");
        }
        removed
    }
}
