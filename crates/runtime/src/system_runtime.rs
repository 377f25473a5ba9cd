use crate::runtime_error::RuntimeError;
use crate::runtime_handle::{RuntimeHandle, RuntimeSource};
use crate::runtime_spec::RuntimeSpec;
use nodekit_platform::PlatformKey;
use nodekit_process::Command;
use semver::Version;
use std::path::{Path, PathBuf};
use system_env::find_command_on_path;
use tracing::{debug, instrument};

fn find_command(command: &str) -> Option<PathBuf> {
    let path = Path::new(command);

    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    find_command_on_path(command)
}

/// Whether the actual version satisfies the requested major, and minor
/// when the request includes one.
pub fn is_matching_version(requested: &str, actual: &Version) -> bool {
    let mut parts = requested.split('.');

    let major = parts.next().and_then(|part| part.parse::<u64>().ok());
    let minor = parts.next().and_then(|part| part.parse::<u64>().ok());

    match (major, minor) {
        (Some(major), Some(minor)) => actual.major == major && actual.minor == minor,
        (Some(major), None) => actual.major == major,
        _ => false,
    }
}

/// Resolve a runtime that is already installed on the system, and ensure
/// it matches the requested version.
#[instrument(skip_all)]
pub async fn resolve_system_runtime(
    spec: &RuntimeSpec,
    platform: PlatformKey,
) -> Result<RuntimeHandle, RuntimeError> {
    let node_path = find_command(&spec.command).ok_or_else(|| RuntimeError::SystemNodeNotFound {
        command: spec.command.clone(),
    })?;

    let output = Command::new(&node_path)
        .arg("--version")
        .exec_capture_output()
        .await?;
    let raw_version = output.stdout_string();

    let actual = Version::parse(raw_version.trim_start_matches('v')).map_err(|_| {
        RuntimeError::SystemNodeUnknownVersion {
            command: spec.command.clone(),
            output: raw_version.clone(),
        }
    })?;

    if !is_matching_version(&spec.version, &actual) {
        return Err(RuntimeError::SystemNodeVersionMismatch {
            command: spec.command.clone(),
            expected: spec.version.clone(),
            actual: actual.to_string(),
        });
    }

    debug!(
        node = ?node_path,
        version = %actual,
        "Using system runtime"
    );

    let bin_dir = node_path
        .parent()
        .map(|dir| dir.to_path_buf())
        .unwrap_or_default();

    // Prefer the package manager that sits next to the binary
    let locate_tool = |name: &str| {
        let sibling = bin_dir.join(platform.cmd_name(name));

        if sibling.exists() {
            sibling
        } else {
            find_command(name).unwrap_or_else(|| PathBuf::from(platform.cmd_name(name)))
        }
    };

    Ok(RuntimeHandle {
        source: RuntimeSource::System,
        platform,
        version: actual.to_string(),
        npm_path: locate_tool("npm"),
        npx_path: locate_tool("npx"),
        bin_dir,
        node_path,
    })
}
