use thiserror::Error;

#[derive(Error, Debug)]
pub enum CountyError {
    #[error("unable to load county boundaries file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("failed to read county boundaries as GeoJSON: {0}")]
    GeoJsonError(String),
    #[error("county boundaries must be a FeatureCollection but found a single {0}")]
    NotFeatureCollection(String),
    #[error("county boundaries are required for a '{0}' run")]
    BoundariesRequired(String),
    #[error("no valid boundary found for any county of '{0}'")]
    GeographyNotCovered(String),
}
