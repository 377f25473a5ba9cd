use crate::host::{HostArch, HostOs};
use crate::platform_error::PlatformError;
use serde::{Deserialize, Serialize};
use std::env::consts;
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies a Node.js distribution target, like `linux-x64`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PlatformKey {
    pub os: HostOs,
    pub arch: HostArch,
}

impl PlatformKey {
    /// Detect the key for the running host.
    pub fn detect() -> Result<PlatformKey, PlatformError> {
        Self::from_rust_consts(consts::OS, consts::ARCH)
    }

    pub fn from_rust_consts(os: &str, arch: &str) -> Result<PlatformKey, PlatformError> {
        let os = HostOs::from_rust_os(os)?;
        let arch = HostArch::from_rust_arch(os, arch)?;

        Ok(PlatformKey { os, arch })
    }

    pub fn from_parts(os: HostOs, arch: HostArch) -> PlatformKey {
        PlatformKey { os, arch }
    }

    /// Archive extension published for this platform.
    pub fn archive_extension(&self) -> &'static str {
        if self.os.is_windows() {
            "zip"
        } else {
            "tar.gz"
        }
    }

    /// Top-level folder name within the archive: `node-v<version>-<os>-<arch>`.
    pub fn dist_name(&self, version: &str) -> String {
        format!("node-v{version}-{self}")
    }

    pub fn archive_file_name(&self, version: &str) -> String {
        format!("{}.{}", self.dist_name(version), self.archive_extension())
    }

    pub fn exe_name(&self, name: &str) -> String {
        if self.os.is_windows() {
            format!("{name}.exe")
        } else {
            name.to_owned()
        }
    }

    /// Name of a shell shim, as created by npm for installed packages.
    pub fn cmd_name(&self, name: &str) -> String {
        if self.os.is_windows() {
            format!("{name}.cmd")
        } else {
            name.to_owned()
        }
    }

    /// Directory holding executables within an install.
    pub fn bin_dir(&self, install_dir: &Path) -> PathBuf {
        if self.os.is_windows() {
            install_dir.to_path_buf()
        } else {
            install_dir.join("bin")
        }
    }

    pub fn node_path(&self, install_dir: &Path) -> PathBuf {
        self.bin_dir(install_dir).join(self.exe_name("node"))
    }

    /// Directory of the npm package bundled with the runtime.
    pub fn npm_package_dir(&self, install_dir: &Path) -> PathBuf {
        if self.os.is_windows() {
            install_dir.join("node_modules").join("npm")
        } else {
            install_dir.join("lib").join("node_modules").join("npm")
        }
    }

    pub fn npm_cli_script(&self, install_dir: &Path) -> PathBuf {
        self.npm_package_dir(install_dir)
            .join("bin")
            .join("npm-cli.js")
    }

    pub fn npx_cli_script(&self, install_dir: &Path) -> PathBuf {
        self.npm_package_dir(install_dir)
            .join("bin")
            .join("npx-cli.js")
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch.dist_name(self.os))
    }
}
