use crate::{
    algorithm::{county::CountyError, model_id::ModelIdError},
    model::osm::OsmError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoadwayError {
    #[error(transparent)]
    Import(#[from] OsmError),
    #[error(transparent)]
    County(#[from] CountyError),
    #[error(transparent)]
    ModelId(#[from] ModelIdError),
    #[error("failure building roadway network: {0}")]
    BuildError(String),
    #[error("link {0} references node {1} which is not in the network")]
    MissingNode(String, String),
    #[error("failure writing {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("failure writing {0}: {1}")]
    IoError(String, std::io::Error),
    #[error("failure serializing {0}: {1}")]
    JsonError(String, serde_json::Error),
    #[error("output file {0} already exists")]
    OutputExists(String),
}
