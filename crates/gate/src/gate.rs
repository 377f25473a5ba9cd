use crate::fingerprint::{FileSignature, Fingerprint};
use crate::gate_error::GateError;
use nodekit_common::color;
use nodekit_common::path::standardize_separators;
use nodekit_hash::{ContentHasher, hash_file_sha256};
use starbase_utils::glob;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, instrument, trace};

/// Files a step declares, relative to the workspace root. Inputs and
/// output files may be globs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepFiles {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub output_dirs: Vec<String>,
}

impl StepFiles {
    pub fn has_outputs(&self) -> bool {
        !self.outputs.is_empty() || !self.output_dirs.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StaleReason {
    CommandChanged,
    InputsChanged,
    MissingOutput(String),
    NoOutputs,
    NoPriorRun,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::CommandChanged => write!(f, "command changed"),
            StaleReason::InputsChanged => write!(f, "inputs changed"),
            StaleReason::MissingOutput(output) => write!(f, "output {output} is missing"),
            StaleReason::NoOutputs => write!(f, "no outputs declared"),
            StaleReason::NoPriorRun => write!(f, "no previous run"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GateDecision {
    UpToDate,
    Stale(StaleReason),
}

impl GateDecision {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, GateDecision::UpToDate)
    }
}

/// Decides whether a step can be skipped. Holds no state of its own;
/// the prior fingerprint is supplied by the caller.
pub struct IncrementalGate {
    workspace_root: PathBuf,
}

impl IncrementalGate {
    pub fn new(workspace_root: impl AsRef<Path>) -> Self {
        IncrementalGate {
            workspace_root: workspace_root.as_ref().to_path_buf(),
        }
    }

    /// Fingerprint the current state of the declared inputs.
    #[instrument(skip_all)]
    pub fn fingerprint(
        &self,
        command: Vec<String>,
        files: &StepFiles,
    ) -> Result<Fingerprint, GateError> {
        let mut inputs = BTreeMap::new();

        for input in &files.inputs {
            if glob::is_glob(input) {
                for file in glob::walk_files(&self.workspace_root, [input])? {
                    let signature = self.sign(&file)?;

                    inputs.insert(self.to_relative(&file), signature);
                }
            } else {
                let file = self.workspace_root.join(input);

                inputs.insert(standardize_separators(input), self.sign(&file)?);
            }
        }

        let mut hasher = ContentHasher::new("fingerprint");
        let hash_error = |_| GateError::Hash {
            label: command.join(" "),
        };

        hasher.hash_content(&command).map_err(hash_error)?;
        hasher.hash_content(&inputs).map_err(hash_error)?;

        let hash = hasher.generate_hash().map_err(hash_error)?;

        Ok(Fingerprint {
            command,
            inputs,
            hash,
        })
    }

    /// Compare the current state against the fingerprint recorded after
    /// the last successful run.
    #[instrument(skip_all)]
    pub fn check(
        &self,
        current: &Fingerprint,
        files: &StepFiles,
        prior: Option<&Fingerprint>,
    ) -> Result<GateDecision, GateError> {
        if !files.has_outputs() {
            return Ok(GateDecision::Stale(StaleReason::NoOutputs));
        }

        let Some(prior) = prior.filter(|prior| !prior.hash.is_empty()) else {
            return Ok(GateDecision::Stale(StaleReason::NoPriorRun));
        };

        if prior.command != current.command {
            return Ok(GateDecision::Stale(StaleReason::CommandChanged));
        }

        if prior.hash != current.hash || prior.inputs != current.inputs {
            for (path, signature) in &current.inputs {
                if prior.inputs.get(path) != Some(signature) {
                    trace!(input = path, "Input changed since the last run");
                }
            }

            return Ok(GateDecision::Stale(StaleReason::InputsChanged));
        }

        if let Some(missing) = self.find_missing_output(files)? {
            return Ok(GateDecision::Stale(StaleReason::MissingOutput(missing)));
        }

        Ok(GateDecision::UpToDate)
    }

    /// Whether a step with the declared files, last run with the prior
    /// fingerprint, can be skipped.
    pub fn is_up_to_date(
        &self,
        command: Vec<String>,
        files: &StepFiles,
        prior: Option<&Fingerprint>,
    ) -> Result<bool, GateError> {
        let current = self.fingerprint(command, files)?;
        let decision = self.check(&current, files, prior)?;

        if let GateDecision::Stale(reason) = &decision {
            debug!("Not up to date, {reason}");
        }

        Ok(decision.is_up_to_date())
    }

    fn find_missing_output(&self, files: &StepFiles) -> Result<Option<String>, GateError> {
        // Literal paths first, globs are costly
        for output in files.outputs.iter().filter(|output| !glob::is_glob(output)) {
            if !self.workspace_root.join(output).exists() {
                return Ok(Some(output.to_owned()));
            }
        }

        for output in &files.output_dirs {
            if !self.workspace_root.join(output).is_dir() {
                return Ok(Some(output.to_owned()));
            }
        }

        for output in files.outputs.iter().filter(|output| glob::is_glob(output)) {
            if glob::walk_files(&self.workspace_root, [output])?.is_empty() {
                return Ok(Some(output.to_owned()));
            }
        }

        Ok(None)
    }

    fn sign(&self, path: &Path) -> Result<FileSignature, GateError> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                trace!(input = ?path, "Input does not exist");

                return Ok(FileSignature::missing());
            }
            Err(error) => {
                return Err(GateError::Fingerprint {
                    path: path.to_path_buf(),
                    error: Box::new(error),
                });
            }
        };

        let modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .and_then(|duration| u64::try_from(duration.as_millis()).ok())
            .unwrap_or_default();

        let digest = if metadata.is_file() {
            Some(
                hash_file_sha256(path).map_err(|error| GateError::Fingerprint {
                    path: path.to_path_buf(),
                    error: Box::new(error),
                })?,
            )
        } else {
            None
        };

        trace!(digest = ?digest, "Fingerprinted input {}", color::path(path));

        Ok(FileSignature {
            exists: true,
            size: metadata.len(),
            modified,
            digest,
        })
    }

    fn to_relative(&self, path: &Path) -> String {
        standardize_separators(
            path.strip_prefix(&self.workspace_root)
                .unwrap_or(path)
                .to_string_lossy(),
        )
    }
}
