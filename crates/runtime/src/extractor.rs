use crate::runtime_error::RuntimeError;
use nodekit_archive::{ArchiveFormat, unpack};
use nodekit_common::color;
use nodekit_platform::PlatformKey;
use starbase_utils::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Executables located within an extracted runtime.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuntimeHome {
    pub dir: PathBuf,
    pub bin_dir: PathBuf,
    pub node_path: PathBuf,
    pub npm_cli_path: PathBuf,
    pub npx_cli_path: PathBuf,
}

/// Unpacks archives into a staging directory and promotes them with a
/// single rename once the contents have been validated.
#[derive(Clone, Copy, Debug)]
pub struct Extractor {
    platform: PlatformKey,
}

impl Extractor {
    pub fn new(platform: PlatformKey) -> Self {
        Extractor { platform }
    }

    /// Locate the executables within an install directory. Returns `None`
    /// when the directory does not exist.
    pub fn locate(&self, dir: &Path) -> Result<Option<RuntimeHome>, RuntimeError> {
        if !dir.exists() {
            return Ok(None);
        }

        let home = RuntimeHome {
            dir: dir.to_path_buf(),
            bin_dir: self.platform.bin_dir(dir),
            node_path: self.platform.node_path(dir),
            npm_cli_path: self.platform.npm_cli_script(dir),
            npx_cli_path: self.platform.npx_cli_script(dir),
        };

        for required in [&home.node_path, &home.npm_cli_path] {
            if !required.exists() {
                return Err(RuntimeError::MalformedDistribution {
                    dir: dir.to_path_buf(),
                    missing: required.to_owned(),
                });
            }
        }

        Ok(Some(home))
    }

    /// Extract the archive into the target directory. The `strip_prefix` is
    /// the top-level folder within the archive, which is removed.
    #[instrument(skip(self))]
    pub fn extract(
        &self,
        archive_path: &Path,
        format: ArchiveFormat,
        target_dir: &Path,
        strip_prefix: Option<&str>,
    ) -> Result<RuntimeHome, RuntimeError> {
        if let Some(home) = self.locate(target_dir)? {
            debug!(
                "Runtime already extracted to {}, skipping",
                color::path(target_dir)
            );

            return Ok(home);
        }

        let staging_dir = create_staging_path(target_dir);

        debug!(
            archive = ?archive_path,
            staging = ?staging_dir,
            "Extracting runtime into staging directory",
        );

        let result = unpack(archive_path, &staging_dir, format, strip_prefix)
            .map_err(RuntimeError::from)
            .and_then(|_| self.locate(&staging_dir));

        if let Err(error) = result {
            remove_staging(&staging_dir);

            return Err(error);
        }

        if let Err(error) = fs::rename(&staging_dir, target_dir) {
            remove_staging(&staging_dir);

            // Another process may have promoted the same runtime first
            if let Some(home) = self.locate(target_dir)? {
                debug!("Runtime was promoted concurrently, using existing");

                return Ok(home);
            }

            return Err(error.into());
        }

        debug!("Promoted runtime to {}", color::path(target_dir));

        self.locate(target_dir)?
            .ok_or_else(|| RuntimeError::MalformedDistribution {
                dir: target_dir.to_path_buf(),
                missing: target_dir.to_path_buf(),
            })
    }
}

/// Sibling of the target, so the final rename stays on one filesystem.
fn create_staging_path(target_dir: &Path) -> PathBuf {
    let name = target_dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "runtime".into());

    target_dir.with_file_name(format!(".{name}.staging-{}", Uuid::new_v4()))
}

fn remove_staging(staging_dir: &Path) {
    if let Err(error) = fs::remove_dir_all(staging_dir) {
        warn!(
            staging = ?staging_dir,
            "Failed to remove staging directory: {error}"
        );
    }
}
