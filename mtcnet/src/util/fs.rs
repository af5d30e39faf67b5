use crate::cache::CacheError;
use std::path::Path;

/// helper function to "mkdir -p path" - make all directories along a path
pub fn create_dirs<P>(path: P) -> Result<(), CacheError>
where
    P: AsRef<Path>,
{
    let dirspath = path.as_ref();
    if !dirspath.is_dir() {
        std::fs::create_dir_all(dirspath).map_err(|e| {
            CacheError::IoError(
                format!(
                    "error building directory '{}'",
                    dirspath.to_str().unwrap_or_default()
                ),
                e,
            )
        })
    } else {
        Ok(())
    }
}
