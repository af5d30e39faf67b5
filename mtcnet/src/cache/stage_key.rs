use super::CacheError;
use mtcnet_osm::model::feature::Geography;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::{fmt::Display, path::Path, time::UNIX_EPOCH};

/// identity of an input file as seen by the cache: a changed size or
/// modification time changes every key built from it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FileFingerprint {
    pub path: String,
    pub size: u64,
    pub modified_secs: u64,
}

impl FileFingerprint {
    pub fn of(path: &str) -> Result<FileFingerprint, CacheError> {
        let metadata = std::fs::metadata(Path::new(path))
            .map_err(|e| CacheError::MetadataError(path.to_string(), e))?;
        let modified_secs = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Ok(FileFingerprint {
            path: path.to_string(),
            size: metadata.len(),
            modified_secs,
        })
    }
}

/// content address of a stage snapshot: stage number, stage name, geography
/// and the SHA-256 digest of the stage's input parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageKey {
    pub stage: u8,
    pub name: &'static str,
    pub geography: String,
    pub digest: String,
}

impl StageKey {
    pub fn new<P: Serialize>(
        stage: u8,
        name: &'static str,
        geography: &Geography,
        parameters: &P,
    ) -> Result<StageKey, CacheError> {
        let bytes = serde_json::to_vec(parameters)
            .map_err(|e| CacheError::KeyError(format!("{stage}_{name}"), e))?;
        let digest = hex::encode(Sha256::digest(&bytes));
        Ok(StageKey {
            stage,
            name,
            geography: geography.name_no_spaces(),
            digest,
        })
    }

    /// file name prefix shared by every snapshot of this stage and geography
    pub fn prefix(&self) -> String {
        format!("{}_{}_{}_", self.stage, self.name, self.geography)
    }

    pub fn filename(&self) -> String {
        format!("{}{}.json.gz", self.prefix(), self.digest)
    }
}

impl Display for StageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix(), &self.digest[..12.min(self.digest.len())])
    }
}
