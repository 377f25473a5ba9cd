use crate::packager_error::PackagerError;
use crate::resolver::{BundledTool, bundled_tool};
use nodekit_common::color;
use nodekit_config::PackagerSettings;
use nodekit_runtime::RuntimeHandle;
use scc::hash_map::Entry;
use starbase_utils::fs;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Installs packagers from their `npmPackage` with the runtime's npm.
/// Installs are staged and renamed into place, one at a time per directory.
#[derive(Default)]
pub struct PackagerInstaller {
    locks: scc::HashMap<PathBuf, Arc<Mutex<()>>>,
}

impl PackagerInstaller {
    async fn get_lock(&self, key: PathBuf) -> Arc<Mutex<()>> {
        match self.locks.entry_async(key).await {
            Entry::Occupied(o) => Arc::clone(o.get()),
            Entry::Vacant(v) => {
                let lock = Arc::new(Mutex::new(()));

                v.insert_entry(Arc::clone(&lock));

                lock
            }
        }
    }

    /// Path of the packager's own binary once installed.
    pub fn get_binary_path(runtime: &RuntimeHandle, settings: &PackagerSettings) -> PathBuf {
        let platform = runtime.platform;

        platform
            .bin_dir(&settings.install_dir())
            .join(platform.cmd_name(&settings.command))
    }

    /// Install the packager unless its binary already exists. Returns the
    /// install directory.
    #[instrument(skip_all, fields(packager = %settings.name))]
    pub async fn install(
        &self,
        runtime: &RuntimeHandle,
        settings: &PackagerSettings,
        working_dir: &Path,
        cancel_token: Option<CancellationToken>,
    ) -> Result<PathBuf, PackagerError> {
        let install_dir = settings.install_dir();
        let lock = self.get_lock(install_dir.clone()).await;
        let _guard = lock.lock().await;

        if Self::get_binary_path(runtime, settings).exists() {
            debug!(
                "Packager already installed to {}",
                color::path(&install_dir)
            );

            return Ok(install_dir);
        }

        let Some(package) = settings.package_specifier() else {
            return Err(PackagerError::NotConfigured {
                name: settings.name.clone(),
                command: settings.command.clone(),
            });
        };

        // A previous install without the binary is incomplete
        if install_dir.exists() {
            warn!(
                install_dir = ?install_dir,
                "Packager install is incomplete, reinstalling"
            );

            fs::remove_dir_all(&install_dir)?;
        }

        let staging_dir = create_staging_path(&install_dir);

        debug!(
            package = %package,
            staging = ?staging_dir,
            "Installing packager with npm",
        );

        fs::create_dir_all(&staging_dir)?;

        let mut command = bundled_tool(runtime, BundledTool::Npm, working_dir).to_command([
            OsStr::new("install"),
            OsStr::new("--global"),
            OsStr::new("--no-save"),
            OsStr::new("--prefix"),
            staging_dir.as_os_str(),
            OsStr::new(&package),
        ]);

        if let Some(token) = cancel_token {
            command.cancel_with(token);
        }

        if let Err(error) = command.exec_capture_output().await {
            remove_staging(&staging_dir);

            return Err(error.into());
        }

        if let Err(error) = fs::rename(&staging_dir, &install_dir) {
            remove_staging(&staging_dir);

            if !Self::get_binary_path(runtime, settings).exists() {
                return Err(error.into());
            }
        }

        debug!("Installed packager to {}", color::path(&install_dir));

        Ok(install_dir)
    }
}

fn create_staging_path(install_dir: &Path) -> PathBuf {
    let name = install_dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "packager".into());

    install_dir.with_file_name(format!(".{name}.staging-{}", Uuid::new_v4()))
}

fn remove_staging(staging_dir: &Path) {
    if let Err(error) = fs::remove_dir_all(staging_dir) {
        warn!(
            staging = ?staging_dir,
            "Failed to remove staging directory: {error}"
        );
    }
}
