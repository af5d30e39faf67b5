mod cache_error;
mod stage_cache;
mod stage_key;

pub use cache_error::CacheError;
pub use stage_cache::StageCache;
pub use stage_key::{FileFingerprint, StageKey};
