use crate::cache::CacheError;
use mtcnet_gtfs::transit::TransitError;
use mtcnet_osm::{
    algorithm::{county::CountyError, model_id::ModelIdError},
    model::{network::RoadwayError, osm::OsmError},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkCliError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("failure importing OpenStreetMap data: {source}")]
    OsmError {
        #[from]
        source: OsmError,
    },
    #[error("failure building roadway network: {source}")]
    RoadwayError {
        #[from]
        source: RoadwayError,
    },
    #[error("failure assigning counties: {source}")]
    CountyError {
        #[from]
        source: CountyError,
    },
    #[error("failure assigning model ids: {source}")]
    ModelIdError {
        #[from]
        source: ModelIdError,
    },
    #[error("failure processing transit: {source}")]
    TransitError {
        #[from]
        source: TransitError,
    },
    #[error("failure using stage cache: {source}")]
    CacheError {
        #[from]
        source: CacheError,
    },
}
