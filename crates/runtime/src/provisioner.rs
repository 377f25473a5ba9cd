use crate::distribution::DistributionDescriptor;
use crate::downloader::Downloader;
use crate::extractor::{Extractor, RuntimeHome};
use crate::runtime_error::RuntimeError;
use crate::runtime_handle::{RuntimeHandle, RuntimeSource};
use crate::runtime_spec::RuntimeSpec;
use crate::system_runtime::resolve_system_runtime;
use nodekit_common::color;
use nodekit_platform::PlatformKey;
use scc::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Produces ready-to-use runtimes, downloading and extracting them into
/// the cache when necessary. Owns the cache directory structure.
pub struct RuntimeProvisioner {
    downloader: Downloader,
    extractor: Extractor,
    locks: scc::HashMap<String, Arc<Mutex<()>>>,
    platform: PlatformKey,
}

impl RuntimeProvisioner {
    /// Create a provisioner for the running host.
    pub fn detect() -> Result<Self, RuntimeError> {
        Ok(Self::new(PlatformKey::detect()?, Downloader::new()))
    }

    pub fn new(platform: PlatformKey, downloader: Downloader) -> Self {
        RuntimeProvisioner {
            downloader,
            extractor: Extractor::new(platform),
            locks: scc::HashMap::default(),
            platform,
        }
    }

    pub fn platform(&self) -> PlatformKey {
        self.platform
    }

    async fn get_lock(&self, key: String) -> Arc<Mutex<()>> {
        match self.locks.entry_async(key).await {
            Entry::Occupied(o) => Arc::clone(o.get()),
            Entry::Vacant(v) => {
                let lock = Arc::new(Mutex::new(()));

                v.insert_entry(Arc::clone(&lock));

                lock
            }
        }
    }

    #[instrument(skip_all, fields(version = %spec.version))]
    pub async fn provision(&self, spec: &RuntimeSpec) -> Result<RuntimeHandle, RuntimeError> {
        if !spec.download {
            debug!("Downloading disabled, resolving runtime from the system");

            return resolve_system_runtime(spec, self.platform).await;
        }

        let descriptor = DistributionDescriptor::new(spec, self.platform)?;
        let lock = self.get_lock(descriptor.cache_key()).await;
        let _guard = lock.lock().await;

        if let Some(home) = self.extractor.locate(&descriptor.install_dir)? {
            debug!(
                "Runtime {} already installed to {}",
                descriptor.cache_key(),
                color::path(&home.dir)
            );

            return Ok(self.create_handle(&descriptor, home));
        }

        let archive_path = self.downloader.fetch(&descriptor).await?;
        let extractor = self.extractor;
        let format = descriptor.archive_format;
        let install_dir = descriptor.install_dir.clone();
        let dist_name = descriptor.dist_name.clone();

        let home = tokio::task::spawn_blocking(move || {
            extractor.extract(&archive_path, format, &install_dir, Some(&dist_name))
        })
        .await
        .map_err(|error| RuntimeError::io(&descriptor.install_dir, std::io::Error::other(error)))??;

        debug!(
            "Provisioned runtime {} to {}",
            descriptor.cache_key(),
            color::path(&home.dir)
        );

        Ok(self.create_handle(&descriptor, home))
    }

    fn create_handle(&self, descriptor: &DistributionDescriptor, home: RuntimeHome) -> RuntimeHandle {
        RuntimeHandle {
            source: RuntimeSource::Downloaded,
            platform: descriptor.key,
            version: descriptor.version.clone(),
            bin_dir: home.bin_dir,
            node_path: home.node_path,
            npm_path: home.npm_cli_path,
            npx_path: home.npx_cli_path,
        }
    }
}
