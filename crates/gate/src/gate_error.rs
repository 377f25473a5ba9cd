use miette::Diagnostic;
use nodekit_common::{Style, Stylize};
use starbase_utils::glob::GlobError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum GateError {
    #[diagnostic(transparent)]
    #[error(transparent)]
    Glob(#[from] Box<GlobError>),

    #[diagnostic(code(gate::fingerprint))]
    #[error("Failed to fingerprint {}.", .path.style(Style::Path))]
    Fingerprint {
        path: PathBuf,
        #[source]
        error: Box<std::io::Error>,
    },

    #[diagnostic(code(gate::hash))]
    #[error("Failed to hash the fingerprint of {}.", .label.style(Style::Id))]
    Hash { label: String },
}

impl From<GlobError> for GateError {
    fn from(e: GlobError) -> GateError {
        GateError::Glob(Box::new(e))
    }
}
