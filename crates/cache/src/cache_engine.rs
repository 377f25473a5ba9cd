use crate::cache_item::CacheItem;
use crate::cache_mode::CacheMode;
use nodekit_common::consts::CONFIG_DIRNAME;
use nodekit_common::path::encode_component;
use serde::Serialize;
use serde::de::DeserializeOwned;
use starbase_utils::{fs, json};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CacheEngine {
    /// The `.nodekit/cache` directory relative to workspace root.
    pub cache_dir: PathBuf,

    pub mode: CacheMode,

    /// The `.nodekit/cache/states` directory. Stores the state of each step.
    pub states_dir: PathBuf,
}

impl CacheEngine {
    pub fn new(workspace_root: &Path) -> miette::Result<CacheEngine> {
        Self::with_mode(workspace_root, CacheMode::from_env())
    }

    pub fn with_mode(workspace_root: &Path, mode: CacheMode) -> miette::Result<CacheEngine> {
        let dir = workspace_root.join(CONFIG_DIRNAME).join("cache");
        let states_dir = dir.join("states");
        let cache_tag = dir.join("CACHEDIR.TAG");

        debug!(
            cache_dir = ?dir,
            states_dir = ?states_dir,
            mode = %mode,
            "Creating cache engine",
        );

        fs::create_dir_all(&states_dir)?;

        if !cache_tag.exists() {
            fs::write_file(
                cache_tag,
                r#"Signature: 8a477f597d28d172789f06886806bc55
# This file is a cache directory tag created by nodekit.
# For information see https://bford.info/cachedir"#,
            )?;
        }

        Ok(CacheEngine {
            cache_dir: dir,
            mode,
            states_dir,
        })
    }

    /// Path of the state file for an identifier, like a step id.
    pub fn get_state_path(&self, id: &str) -> PathBuf {
        self.states_dir.join(format!("{}.json", encode_component(id)))
    }

    pub fn cache_state<T>(&self, id: &str) -> miette::Result<CacheItem<T>>
    where
        T: Default + DeserializeOwned + Serialize,
    {
        CacheItem::load(self.get_state_path(id), self.mode)
    }

    pub fn write_state<T>(&self, id: &str, state: &T) -> miette::Result<()>
    where
        T: ?Sized + Serialize,
    {
        let path = self.get_state_path(id);

        if self.mode.is_writable() {
            debug!(cache = ?path, "Writing state");

            json::write_file(path, state, false)?;
        }

        Ok(())
    }
}
