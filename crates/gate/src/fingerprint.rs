use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Signature of a single declared input.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileSignature {
    pub exists: bool,
    pub size: u64,
    /// Modification time in milliseconds since the epoch.
    pub modified: u64,
    /// SHA256 of the file contents. Directories have none.
    pub digest: Option<String>,
}

impl FileSignature {
    pub fn missing() -> Self {
        FileSignature::default()
    }
}

/// What a host must persist after a successful run, and what is compared
/// against on the next run.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fingerprint {
    /// Executable and arguments of the step.
    pub command: Vec<String>,

    /// Workspace relative path (with forward slashes) to signature.
    pub inputs: BTreeMap<String, FileSignature>,

    /// Digest over the command and all inputs.
    pub hash: String,
}
