use crate::cache_mode::CacheMode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use starbase_utils::json;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A JSON document on disk, read and written according to the cache mode.
pub struct CacheItem<T: Default + DeserializeOwned + Serialize> {
    pub data: T,
    pub mode: CacheMode,
    pub path: PathBuf,
}

impl<T: Default + DeserializeOwned + Serialize> CacheItem<T> {
    pub fn load<P: AsRef<Path>>(path: P, mode: CacheMode) -> miette::Result<CacheItem<T>> {
        let path = path.as_ref();
        let mut data = T::default();

        if mode.is_readable() {
            if path.exists() {
                debug!(cache = ?path, "Cache hit, reading item");

                // A corrupted state is treated like a miss, the next save replaces it
                match json::read_file(path) {
                    Ok(item) => data = item,
                    Err(error) => {
                        debug!(cache = ?path, "Failed to parse cache item: {error}");
                    }
                }
            } else {
                debug!(cache = ?path, "Cache miss, does not exist");
            }
        } else {
            trace!(cache = ?path, "Cache is not readable, skipping checks");
        }

        Ok(CacheItem {
            data,
            mode,
            path: path.to_path_buf(),
        })
    }

    pub fn save(&self) -> miette::Result<()> {
        if self.mode.is_writable() {
            debug!(cache = ?self.path, "Writing cache item");

            json::write_file(&self.path, &self.data, false)?;
        } else {
            trace!(cache = ?self.path, "Cache is not writeable, skipping save");
        }

        Ok(())
    }
}
