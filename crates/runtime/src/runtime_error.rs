use miette::Diagnostic;
use nodekit_archive::ArchiveError;
use nodekit_common::{Style, Stylize};
use nodekit_platform::PlatformError;
use nodekit_process::ProcessError;
use starbase_utils::fs::FsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum RuntimeError {
    #[diagnostic(transparent)]
    #[error(transparent)]
    Archive(#[from] Box<ArchiveError>),

    #[diagnostic(code(runtime::checksum_mismatch))]
    #[error(
        "Checksum mismatch for {}. Expected {} but received {}.",
        .file.style(Style::Path),
        .expected.style(Style::Hash),
        .actual.style(Style::Hash),
    )]
    ChecksumMismatch {
        file: PathBuf,
        expected: String,
        actual: String,
    },

    #[diagnostic(transparent)]
    #[error(transparent)]
    Fs(#[from] Box<FsError>),

    #[diagnostic(code(runtime::http_status))]
    #[error(
        "Failed to download {}, server responded with a {} status.",
        .url.style(Style::Url),
        .status.style(Style::Symbol),
    )]
    HttpStatus { url: String, status: u16 },

    #[diagnostic(code(runtime::io))]
    #[error("Failed to write {}.", .path.style(Style::Path))]
    Io {
        path: PathBuf,
        #[source]
        error: Box<std::io::Error>,
    },

    #[diagnostic(
        code(runtime::malformed_distribution),
        help("Remove the directory and try again.")
    )]
    #[error(
        "Distribution in {} is malformed, expected {} to exist.",
        .dir.style(Style::Path),
        .missing.style(Style::Path),
    )]
    MalformedDistribution { dir: PathBuf, missing: PathBuf },

    #[diagnostic(code(runtime::network))]
    #[error("Failed to download {}.", .url.style(Style::Url))]
    Network {
        url: String,
        #[source]
        error: Box<reqwest::Error>,
    },

    #[diagnostic(transparent)]
    #[error(transparent)]
    Platform(#[from] Box<PlatformError>),

    #[diagnostic(transparent)]
    #[error(transparent)]
    Process(#[from] Box<ProcessError>),

    #[diagnostic(
        code(runtime::system::not_found),
        help("Install Node.js, or enable downloading with `node.download`.")
    )]
    #[error(
        "Unable to find {} on {}.",
        .command.style(Style::Shell),
        "PATH".style(Style::Symbol),
    )]
    SystemNodeNotFound { command: String },

    #[diagnostic(code(runtime::system::unknown_version))]
    #[error(
        "Unable to determine the version of {}, received {}.",
        .command.style(Style::Shell),
        .output.style(Style::MutedLight),
    )]
    SystemNodeUnknownVersion { command: String, output: String },

    #[diagnostic(code(runtime::system::version_mismatch))]
    #[error(
        "System {} is version {}, but {} was requested.",
        .command.style(Style::Shell),
        .actual.style(Style::Hash),
        .expected.style(Style::Hash),
    )]
    SystemNodeVersionMismatch {
        command: String,
        expected: String,
        actual: String,
    },
}

impl RuntimeError {
    pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        RuntimeError::Io {
            path: path.into(),
            error: Box::new(error),
        }
    }

    /// Transient network failures that are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpStatus { status: 404, .. })
    }
}

impl From<ArchiveError> for RuntimeError {
    fn from(error: ArchiveError) -> Self {
        RuntimeError::Archive(Box::new(error))
    }
}

impl From<FsError> for RuntimeError {
    fn from(error: FsError) -> Self {
        RuntimeError::Fs(Box::new(error))
    }
}

impl From<PlatformError> for RuntimeError {
    fn from(error: PlatformError) -> Self {
        RuntimeError::Platform(Box::new(error))
    }
}

impl From<ProcessError> for RuntimeError {
    fn from(error: ProcessError) -> Self {
        RuntimeError::Process(Box::new(error))
    }
}
