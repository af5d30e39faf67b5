use super::{CacheError, StageKey};
use crate::util::fs::create_dirs;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// content-addressed store of stage results as gzipped JSON files. a snapshot
/// is only ever read back under the exact key it was written with, so changed
/// inputs never reuse stale results.
#[derive(Debug, Clone)]
pub struct StageCache {
    directory: PathBuf,
    enabled: bool,
}

impl StageCache {
    pub fn new(directory: &Path, enabled: bool) -> StageCache {
        StageCache {
            directory: directory.to_path_buf(),
            enabled,
        }
    }

    pub fn disabled() -> StageCache {
        StageCache::new(Path::new(""), false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn entry_path(&self, key: &StageKey) -> PathBuf {
        self.directory.join(key.filename())
    }

    /// reads a snapshot. a missing entry is a miss, and so is one that fails
    /// to decode, which is logged and left for the next store to replace.
    pub fn load<T: DeserializeOwned>(&self, key: &StageKey) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let path = self.entry_path(key);
        self.read_entry(&path)
    }

    /// the most recently written snapshot of a stage and geography, whatever
    /// its parameters. used when the stage inputs are no longer available.
    pub fn load_latest<T: DeserializeOwned>(&self, key: &StageKey) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let prefix = key.prefix();
        let entries = std::fs::read_dir(&self.directory).ok()?;
        let latest = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                name.starts_with(&prefix) && name.ends_with(".json.gz")
            })
            .filter_map(|entry| {
                let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
                Some((modified, entry.path()))
            })
            .max_by_key(|(modified, _)| *modified)?;
        self.read_entry(&latest.1)
    }

    fn read_entry<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => {
                log::debug!("cache miss: {}", path.to_string_lossy());
                return None;
            }
        };
        let reader = BufReader::new(GzDecoder::new(file));
        match serde_json::from_reader(reader) {
            Ok(value) => {
                log::info!("cache hit: {}", path.to_string_lossy());
                Some(value)
            }
            Err(e) => {
                log::warn!(
                    "cache entry {} could not be decoded, treating it as a miss: {e}",
                    path.to_string_lossy()
                );
                None
            }
        }
    }

    /// writes a snapshot to a temporary file in the cache directory and
    /// renames it into place once complete.
    pub fn store<T: Serialize>(&self, key: &StageKey, value: &T) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }
        create_dirs(&self.directory)?;
        let path = self.entry_path(key);
        let tmp_path = self
            .directory
            .join(format!(".{}.tmp-{}", key.filename(), std::process::id()));
        let tmp_str = tmp_path.to_string_lossy().to_string();
        let file = File::create(&tmp_path).map_err(|e| CacheError::IoError(tmp_str.clone(), e))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, value)
            .map_err(|e| CacheError::EncodeError(key.to_string(), e))?;
        let mut buffer = encoder
            .finish()
            .map_err(|e| CacheError::IoError(tmp_str.clone(), e))?;
        buffer
            .flush()
            .map_err(|e| CacheError::IoError(tmp_str.clone(), e))?;
        drop(buffer);
        std::fs::rename(&tmp_path, &path).map_err(|e| CacheError::IoError(tmp_str, e))?;
        log::info!("cached stage {key}");
        Ok(())
    }

    /// returns the cached value for the key, or computes and stores it.
    pub fn get_or_compute<T, E, F>(&self, key: &StageKey, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.load(key) {
            return Ok(value);
        }
        let value = compute()?;
        self.store(key, &value)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::StageCache;
    use crate::cache::{CacheError, StageKey};
    use mtcnet_osm::model::feature::Geography;
    use std::collections::BTreeMap;

    fn key(parameter: &str) -> StageKey {
        match StageKey::new(0, "raw_graph", &Geography::BayArea, &parameter) {
            Ok(k) => k,
            Err(e) => panic!("{e}"),
        }
    }

    fn tempdir() -> tempfile::TempDir {
        match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        }
    }

    fn sample() -> BTreeMap<String, Vec<i64>> {
        BTreeMap::from([(String::from("a"), vec![1, 2, 3])])
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempdir();
        let cache = StageCache::new(dir.path(), true);
        if let Err(e) = cache.store(&key("v1"), &sample()) {
            panic!("{e}")
        }
        let loaded: Option<BTreeMap<String, Vec<i64>>> = cache.load(&key("v1"));
        assert_eq!(loaded, Some(sample()));
        // no temporary files remain
        let names = match std::fs::read_dir(dir.path()) {
            Ok(rd) => rd
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect::<Vec<_>>(),
            Err(e) => panic!("{e}"),
        };
        assert_eq!(names, vec![key("v1").filename()]);
    }

    #[test]
    fn test_changed_parameters_miss() {
        let dir = tempdir();
        let cache = StageCache::new(dir.path(), true);
        if let Err(e) = cache.store(&key("v1"), &sample()) {
            panic!("{e}")
        }
        let loaded: Option<BTreeMap<String, Vec<i64>>> = cache.load(&key("v2"));
        assert_eq!(loaded, None);
        let latest: Option<BTreeMap<String, Vec<i64>>> = cache.load_latest(&key("v2"));
        assert_eq!(latest, Some(sample()));
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempdir();
        let cache = StageCache::new(dir.path(), true);
        let k = key("v1");
        if let Err(e) = std::fs::write(dir.path().join(k.filename()), b"not gzip at all") {
            panic!("{e}")
        }
        let loaded: Option<BTreeMap<String, Vec<i64>>> = cache.load(&k);
        assert_eq!(loaded, None);

        let mut calls = 0;
        let computed: Result<BTreeMap<String, Vec<i64>>, CacheError> =
            cache.get_or_compute(&k, || {
                calls += 1;
                Ok(sample())
            });
        match computed {
            Ok(v) => assert_eq!(v, sample()),
            Err(e) => panic!("{e}"),
        }
        assert_eq!(calls, 1);
        let reloaded: Option<BTreeMap<String, Vec<i64>>> = cache.load(&k);
        assert_eq!(reloaded, Some(sample()));
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let dir = tempdir();
        let cache = StageCache::new(dir.path(), false);
        if let Err(e) = cache.store(&key("v1"), &sample()) {
            panic!("{e}")
        }
        let loaded: Option<BTreeMap<String, Vec<i64>>> = cache.load(&key("v1"));
        assert_eq!(loaded, None);
        assert!(!dir.path().join(key("v1").filename()).exists());
    }
}
