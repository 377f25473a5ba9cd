use crate::checksum::{ChecksumStatus, verify_checksum};
use crate::distribution::DistributionDescriptor;
use crate::retry::RetryPolicy;
use crate::runtime_error::RuntimeError;
use nodekit_common::color;
use scc::hash_map::Entry;
use starbase_utils::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

/// Fetches distribution archives into the cache. Concurrent requests for the
/// same version and platform share a single download.
pub struct Downloader {
    client: reqwest::Client,
    locks: scc::HashMap<String, Arc<Mutex<()>>>,
    retry: RetryPolicy,
    verify_checksum: bool,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Downloader {
            client,
            locks: scc::HashMap::default(),
            retry: RetryPolicy::default(),
            verify_checksum: true,
        }
    }

    pub fn set_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn set_verify_checksum(mut self, state: bool) -> Self {
        self.verify_checksum = state;
        self
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

    /// Return the cached archive for the descriptor, downloading (and verifying)
    /// it first when it is not cached yet.
    #[instrument(skip_all, fields(key = %descriptor.cache_key()))]
    pub async fn fetch(&self, descriptor: &DistributionDescriptor) -> Result<PathBuf, RuntimeError> {
        let lock = self.get_lock(descriptor.cache_key()).await;
        let _guard = lock.lock().await;

        let archive_path = &descriptor.archive_path;

        if archive_path.exists() {
            if self.is_cached_archive_valid(descriptor)? {
                debug!(
                    archive = ?archive_path,
                    "Archive already downloaded, skipping download"
                );

                return Ok(archive_path.to_owned());
            }

            warn!(
                archive = ?archive_path,
                "Cached archive does not match its checksum, downloading again"
            );

            fs::remove_file(archive_path)?;
        }

        let temp_path = self
            .download_with_retry(&descriptor.archive_url, archive_path)
            .await?;

        if let Err(error) = self.verify_download(descriptor, &temp_path).await {
            fs::remove_file(&temp_path)?;

            return Err(error);
        }

        fs::rename(&temp_path, archive_path)?;

        debug!(
            archive = ?archive_path,
            "Downloaded archive {}",
            color::url(&descriptor.archive_url)
        );

        Ok(archive_path.to_owned())
    }

    /// An existing archive is only checked against checksums already on disk.
    fn is_cached_archive_valid(&self, descriptor: &DistributionDescriptor) -> Result<bool, RuntimeError> {
        let size = std::fs::metadata(&descriptor.archive_path)
            .map_err(|error| RuntimeError::io(&descriptor.archive_path, error))?
            .len();

        if size == 0 {
            return Ok(false);
        }

        if !self.verify_checksum || !descriptor.checksum_path.exists() {
            return Ok(true);
        }

        let status = verify_checksum(
            &descriptor.archive_path,
            &descriptor.archive_file_name(),
            &descriptor.checksum_path,
        )?;

        Ok(!matches!(status, ChecksumStatus::Mismatched { .. }))
    }

    async fn verify_download(
        &self,
        descriptor: &DistributionDescriptor,
        temp_path: &Path,
    ) -> Result<(), RuntimeError> {
        if !self.verify_checksum {
            trace!("Checksum verification disabled");

            return Ok(());
        }

        let Some(checksum_path) = self.fetch_checksums(descriptor).await? else {
            return Ok(());
        };

        match verify_checksum(temp_path, &descriptor.archive_file_name(), &checksum_path)? {
            ChecksumStatus::Matched => {
                debug!("Successfully verified, checksum matches");

                Ok(())
            }
            ChecksumStatus::Unlisted => {
                warn!(
                    "No checksum published for {}, skipping verification",
                    descriptor.archive_file_name()
                );

                Ok(())
            }
            ChecksumStatus::Mismatched { expected, actual } => {
                Err(RuntimeError::ChecksumMismatch {
                    file: descriptor.archive_path.clone(),
                    expected,
                    actual,
                })
            }
        }
    }

    /// Download the checksums document for the descriptor's version. Returns
    /// `None` when the source does not publish one.
    pub async fn fetch_checksums(
        &self,
        descriptor: &DistributionDescriptor,
    ) -> Result<Option<PathBuf>, RuntimeError> {
        let checksum_path = &descriptor.checksum_path;

        if checksum_path.exists() {
            return Ok(Some(checksum_path.to_owned()));
        }

        match self
            .download_with_retry(&descriptor.checksum_url, checksum_path)
            .await
        {
            Ok(temp_path) => {
                fs::rename(&temp_path, checksum_path)?;

                Ok(Some(checksum_path.to_owned()))
            }
            Err(error) if error.is_not_found() || error.is_retryable() => {
                warn!(
                    url = %descriptor.checksum_url,
                    "Checksums unavailable, skipping verification: {error}"
                );

                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Download into a unique temporary file next to the destination, retrying
    /// transient failures. Returns the temporary file path.
    async fn download_with_retry(&self, url: &str, dest: &Path) -> Result<PathBuf, RuntimeError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match self.download_to_temp(url, dest).await {
                Ok(temp_path) => return Ok(temp_path),
                Err(error) if error.is_retryable() && attempt + 1 < max_attempts => {
                    let delay = self.retry.compute_delay(attempt);

                    debug!(
                        url,
                        attempt = attempt + 1,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Download failed, retrying: {error}"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn download_to_temp(&self, url: &str, dest: &Path) -> Result<PathBuf, RuntimeError> {
        let file_name = dest
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let temp_path = dest.with_file_name(format!(".{file_name}.part-{}", Uuid::new_v4()));

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        match self.stream_to_file(url, &temp_path).await {
            Ok(_) => Ok(temp_path),
            Err(error) => {
                if temp_path.exists() {
                    fs::remove_file(&temp_path)?;
                }

                Err(error)
            }
        }
    }

    async fn stream_to_file(&self, url: &str, temp_path: &Path) -> Result<(), RuntimeError> {
        let network_error = |error| RuntimeError::Network {
            url: url.to_owned(),
            error: Box::new(error),
        };
        let write_error = |error| RuntimeError::io(temp_path, error);

        trace!(url, file = ?temp_path, "Downloading file");

        let mut response = self.client.get(url).send().await.map_err(network_error)?;
        let status = response.status();

        if !status.is_success() {
            return Err(RuntimeError::HttpStatus {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let mut file = tokio::fs::File::create(temp_path)
            .await
            .map_err(write_error)?;

        while let Some(chunk) = response.chunk().await.map_err(network_error)? {
            file.write_all(&chunk).await.map_err(write_error)?;
        }

        file.flush().await.map_err(write_error)?;
        file.sync_all().await.map_err(write_error)?;

        Ok(())
    }
}
