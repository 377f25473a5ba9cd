use crate::runtime_error::RuntimeError;
use nodekit_hash::hash_file_sha256;
use starbase_utils::fs;
use std::path::Path;
use tracing::debug;

/// Find the expected SHA256 of a file within a `SHASUMS256.txt` document,
/// where each line is formatted as `<checksum>  <file>`.
pub fn find_checksum(shasums: &str, file_name: &str) -> Option<String> {
    shasums.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let checksum = parts.next()?;
        let name = parts.next()?;

        if name.trim_start_matches('*') == file_name {
            Some(checksum.to_lowercase())
        } else {
            None
        }
    })
}

/// Outcome of comparing a file against a checksums document.
#[derive(Debug, Eq, PartialEq)]
pub enum ChecksumStatus {
    Matched,
    /// The document has no entry for the file.
    Unlisted,
    Mismatched { expected: String, actual: String },
}

pub fn verify_checksum(
    file: &Path,
    file_name: &str,
    checksum_file: &Path,
) -> Result<ChecksumStatus, RuntimeError> {
    let shasums = fs::read_file(checksum_file)?;

    let Some(expected) = find_checksum(&shasums, file_name) else {
        return Ok(ChecksumStatus::Unlisted);
    };

    let actual = hash_file_sha256(file).map_err(|error| RuntimeError::io(file, error))?;

    debug!(file = ?file, expected, actual, "Verifying checksum");

    if actual == expected {
        Ok(ChecksumStatus::Matched)
    } else {
        Ok(ChecksumStatus::Mismatched { expected, actual })
    }
}
