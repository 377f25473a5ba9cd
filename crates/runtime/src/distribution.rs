use crate::runtime_error::RuntimeError;
use crate::runtime_spec::RuntimeSpec;
use nodekit_archive::ArchiveFormat;
use nodekit_common::consts::CHECKSUMS_FILE_NAME;
use nodekit_platform::PlatformKey;
use std::path::PathBuf;

/// Everything needed to download and install one runtime
/// version for one platform.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionDescriptor {
    pub key: PlatformKey,
    pub version: String,

    pub archive_format: ArchiveFormat,
    pub archive_url: String,
    /// Where the downloaded archive is cached.
    pub archive_path: PathBuf,

    pub checksum_url: String,
    /// Where the downloaded checksums are cached.
    pub checksum_path: PathBuf,

    /// Top-level folder within the archive.
    pub dist_name: String,

    /// Final location of the extracted runtime: `<workingDir>/<version>/<platform>`.
    pub install_dir: PathBuf,
}

impl DistributionDescriptor {
    pub fn new(spec: &RuntimeSpec, key: PlatformKey) -> Result<Self, RuntimeError> {
        let version = spec.version.clone();
        let archive_name = key.archive_file_name(&version);
        let downloads_dir = spec.downloads_dir();
        let archive_path = downloads_dir.join(&archive_name);

        Ok(DistributionDescriptor {
            archive_format: ArchiveFormat::from_path(&archive_path)?,
            archive_url: format!("{}/v{version}/{archive_name}", spec.dist_url),
            archive_path,
            checksum_url: format!("{}/v{version}/{CHECKSUMS_FILE_NAME}", spec.dist_url),
            checksum_path: downloads_dir.join(format!("SHASUMS256-v{version}.txt")),
            dist_name: key.dist_name(&version),
            install_dir: spec.working_dir.join(&version).join(key.to_string()),
            key,
            version,
        })
    }

    /// Mutual exclusion key: one per version and platform.
    pub fn cache_key(&self) -> String {
        format!("{}/{}", self.version, self.key)
    }

    pub fn archive_file_name(&self) -> String {
        self.key.archive_file_name(&self.version)
    }
}
