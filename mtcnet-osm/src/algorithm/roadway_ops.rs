use super::{
    county::{CountyAssigner, CountyBoundaries},
    deduplication::duplicate_edge_resolver,
    lanes::lane_resolver,
    model_id::ModelIdAssigner,
    standardization::highway_standardizer,
};
use crate::{
    config::RoadwayConfiguration,
    model::{
        feature::{Geography, Highway},
        network::{RoadwayError, RoadwayNetwork, StandardizedNode},
        osm::graph::{RawEdge, RawGraph},
    },
};

/// turns the raw OSM graph into the standardized, county-assigned and
/// model-numbered roadway network of a geography.
pub fn build_roadway_network(
    raw: &RawGraph,
    geography: &Geography,
    boundaries: Option<&CountyBoundaries>,
    config: &RoadwayConfiguration,
) -> Result<RoadwayNetwork, RoadwayError> {
    eprintln!();
    log::info!("  (((3))) standardizing highway classes and access");
    let edges = raw
        .edges
        .iter()
        .filter(|e| !e.is_self_loop())
        .cloned()
        .collect::<Vec<RawEdge>>();
    let n_loops = raw.edges.len() - edges.len();
    if n_loops > 0 {
        log::info!("dropped {n_loops} self-loop edges");
    }
    let mut links = highway_standardizer::standardize_edges(&edges);

    eprintln!();
    log::info!("  (((4))) resolving lanes");
    lane_resolver::resolve_lanes(&mut links, &edges, config.default_lanes)?;

    eprintln!();
    log::info!("  (((5))) resolving duplicate edges");
    let mut links = duplicate_edge_resolver::resolve_duplicates(links);
    if config.drop_unnamed_service {
        let before = links.len();
        links.retain(|l| l.highway != Highway::Service || l.is_named());
        log::info!("dropped {} unnamed service links", before - links.len());
    }

    let nodes = raw.nodes.iter().map(StandardizedNode::from).collect();
    let mut network = RoadwayNetwork::new(nodes, links);

    eprintln!();
    log::info!("  (((6))) assigning counties for {geography}");
    let assigner = CountyAssigner::new(geography, boundaries)?;
    if config.clip_to_region {
        assigner.clip_to_region(&mut network, geography);
    }
    let n_orphans = network.retain_referenced_nodes();
    if n_orphans > 0 {
        log::info!("dropped {n_orphans} nodes not referenced by any link");
    }
    if network.links.is_empty() {
        return Err(RoadwayError::BuildError(format!(
            "no roadway links remain for {geography}"
        )));
    }
    assigner.assign(&mut network);

    eprintln!();
    log::info!("  (((7))) assigning model ids");
    ModelIdAssigner::new()?.assign(&mut network)?;
    network.validate_endpoints()?;

    log::info!(
        "roadway network for {geography} has {} nodes and {} links",
        network.nodes.len(),
        network.links.len()
    );
    Ok(network)
}
