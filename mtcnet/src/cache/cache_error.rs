#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error("failure reading metadata of {0}: {1}")]
    MetadataError(String, std::io::Error),
    #[error("failure serializing stage parameters for {0}: {1}")]
    KeyError(String, serde_json::Error),
    #[error("failure encoding stage {0}: {1}")]
    EncodeError(String, serde_json::Error),
    #[error("{0}: {1}")]
    IoError(String, std::io::Error),
}
