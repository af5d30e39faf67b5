use thiserror::Error;

#[derive(Error, Debug)]
pub enum OsmError {
    #[error("pbf file {0} does not exist")]
    MissingPbfFile(String),
    #[error("failure reading .pbf file: {source}")]
    PbfReadError {
        #[from]
        source: osmpbf::Error,
    },
    #[error("invalid OSM data: {0}")]
    InvalidOsmData(String),
    #[error("no OSM nodes found inside the study area extent")]
    NoNodesInExtent,
    #[error("no OSM ways remain after filtering to the study area extent")]
    NoWaysInExtent,
    #[error("OSM import produced an empty roadway graph")]
    EmptyGraph,
    #[error("failure drawing progress bar: {0}")]
    ProgressBarError(String),
}
