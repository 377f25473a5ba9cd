use miette::Diagnostic;
use nodekit_common::{Style, Stylize};
use nodekit_process::ProcessError;
use starbase_utils::fs::FsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum PackagerError {
    #[diagnostic(transparent)]
    #[error(transparent)]
    Fs(#[from] Box<FsError>),

    #[diagnostic(
        code(packager::missing_binary),
        help("Ensure the package provides a {} binary.", .command)
    )]
    #[error(
        "Installed {} but could not find {} at {}.",
        .name.style(Style::Id),
        .command.style(Style::Shell),
        .path.style(Style::Path),
    )]
    MissingBinary {
        name: String,
        command: String,
        path: PathBuf,
    },

    #[diagnostic(code(packager::no_cli))]
    #[error("Packager {} does not have a CLI command configured.", .name.style(Style::Id))]
    NoCliCommand { name: String },

    #[diagnostic(
        code(packager::not_configured),
        help("Set {} so it can be installed with npm.", "packager.npmPackage".style(Style::Property))
    )]
    #[error(
        "Packager {} has no {} and {} is not installed.",
        .name.style(Style::Id),
        "npmPackage".style(Style::Property),
        .command.style(Style::Shell),
    )]
    NotConfigured { name: String, command: String },

    #[diagnostic(transparent)]
    #[error(transparent)]
    Process(#[from] Box<ProcessError>),
}

impl From<FsError> for PackagerError {
    fn from(error: FsError) -> Self {
        PackagerError::Fs(Box::new(error))
    }
}

impl From<ProcessError> for PackagerError {
    fn from(error: ProcessError) -> Self {
        PackagerError::Process(Box::new(error))
    }
}
