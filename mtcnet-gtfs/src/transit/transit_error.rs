use mtcnet_osm::{algorithm::model_id::ModelIdError, model::network::RoadwayError};

#[derive(thiserror::Error, Debug)]
pub enum TransitError {
    #[error("Failed to parse gtfs bundle file into `Gtfs` struct: {0}")]
    BundleReadError(#[from] gtfs_structures::Error),
    #[error("Missing lon,lat data and parent_location for stop: {0}")]
    MissingStopLocationAndParentError(String),
    #[error("roadway node {0} matched to a stop has no model node id")]
    MissingModelIdError(String),
    #[error("invalid time period configuration: {0}")]
    InvalidTimePeriodError(String),
    #[error(transparent)]
    ModelIdError(#[from] ModelIdError),
    #[error(transparent)]
    RoadwayError(#[from] RoadwayError),
    #[error("failure writing {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("failure writing {0}: {1}")]
    IoError(String, std::io::Error),
}
