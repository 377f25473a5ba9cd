use crate::platform_error::PlatformError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating systems that Node.js publishes distributions for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Linux,
    #[serde(rename = "darwin")]
    MacOS,
    Windows,
}

impl HostOs {
    // https://doc.rust-lang.org/std/env/consts/constant.OS.html
    pub fn from_rust_os(os: &str) -> Result<HostOs, PlatformError> {
        match os {
            "linux" => Ok(HostOs::Linux),
            "macos" => Ok(HostOs::MacOS),
            "windows" => Ok(HostOs::Windows),
            unknown => Err(PlatformError::UnsupportedOs(unknown.to_owned())),
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, HostOs::Windows)
    }
}

impl fmt::Display for HostOs {
    // https://nodejs.org/dist/v18.16.0/
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                HostOs::Linux => "linux",
                HostOs::MacOS => "darwin",
                HostOs::Windows => "win",
            }
        )
    }
}

// Not everything is supported at the moment...
// https://nodejs.org/api/process.html#processarch
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostArch {
    Arm,
    Arm64,
    Ppc64,
    S390x,
    X64,
    X86,
}

impl HostArch {
    // https://doc.rust-lang.org/std/env/consts/constant.ARCH.html
    pub fn from_rust_arch(os: HostOs, arch: &str) -> Result<HostArch, PlatformError> {
        match arch {
            "arm" => Ok(HostArch::Arm),
            "aarch64" => Ok(HostArch::Arm64),
            "powerpc64" => Ok(HostArch::Ppc64),
            "s390x" if matches!(os, HostOs::Linux) => Ok(HostArch::S390x),
            "x86_64" => Ok(HostArch::X64),
            "x86" => Ok(HostArch::X86),
            unknown => Err(PlatformError::UnsupportedArch {
                os: os.to_string(),
                arch: unknown.to_owned(),
            }),
        }
    }

    /// File name segment of the architecture, which depends on the OS.
    pub fn dist_name(&self, os: HostOs) -> &'static str {
        match self {
            HostArch::Arm => "armv7l",
            HostArch::Arm64 => "arm64",
            HostArch::Ppc64 => {
                if matches!(os, HostOs::Linux) {
                    "ppc64le"
                } else {
                    "ppc64"
                }
            }
            HostArch::S390x => "s390x",
            HostArch::X64 => "x64",
            HostArch::X86 => "x86",
        }
    }
}
