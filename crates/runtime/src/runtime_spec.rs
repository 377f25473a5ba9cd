use nodekit_common::consts::CONFIG_DIRNAME;
use nodekit_common::path::resolve_from;
use nodekit_config::NodeConfig;
use std::path::{Path, PathBuf};

/// Immutable description of the runtime to provision.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuntimeSpec {
    /// Command to locate when using a system runtime.
    pub command: String,
    pub dist_url: String,
    pub download: bool,
    pub verify_checksum: bool,
    /// Version without a leading `v`.
    pub version: String,
    /// Root of the runtime cache.
    pub working_dir: PathBuf,
}

impl RuntimeSpec {
    pub fn new(version: impl AsRef<str>, working_dir: impl AsRef<Path>) -> RuntimeSpec {
        RuntimeSpec {
            command: "node".into(),
            dist_url: nodekit_common::consts::DEFAULT_DIST_URL.into(),
            download: true,
            verify_checksum: true,
            version: normalize_version(version.as_ref()),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &NodeConfig, workspace_root: &Path) -> RuntimeSpec {
        RuntimeSpec {
            command: config.command.clone(),
            dist_url: config.dist_url.trim_end_matches('/').to_owned(),
            download: config.download,
            verify_checksum: config.verify_checksum,
            version: normalize_version(&config.version),
            working_dir: match &config.working_dir {
                Some(dir) => resolve_from(workspace_root, dir),
                None => workspace_root.join(CONFIG_DIRNAME).join("node"),
            },
        }
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.working_dir.join("downloads")
    }
}

fn normalize_version(version: &str) -> String {
    version.trim().trim_start_matches('v').to_owned()
}
