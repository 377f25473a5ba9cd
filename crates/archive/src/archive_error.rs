use miette::Diagnostic;
use nodekit_common::{Style, Stylize};
use starbase_utils::fs::FsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ArchiveError {
    #[diagnostic(transparent)]
    #[error(transparent)]
    Fs(#[from] Box<FsError>),

    #[diagnostic(code(archive::io))]
    #[error("Failed to process archive {}.", .path.style(Style::Path))]
    Io {
        path: PathBuf,
        #[source]
        error: Box<std::io::Error>,
    },

    #[diagnostic(code(archive::unsupported_format))]
    #[error(
        "Unsupported archive format for {}. Only {} and {} are supported.",
        .path.style(Style::Path),
        ".tar.gz".style(Style::Symbol),
        ".zip".style(Style::Symbol),
    )]
    UnsupportedFormat { path: PathBuf },

    #[diagnostic(code(archive::unsafe_link))]
    #[error(
        "Refusing to unpack link {} to {}, as it points outside of the output directory.",
        .path.style(Style::Path),
        .target.style(Style::Path),
    )]
    UnsafeLink { path: PathBuf, target: PathBuf },

    #[diagnostic(code(archive::zip))]
    #[error("Failed to process zip archive {}.", .path.style(Style::Path))]
    Zip {
        path: PathBuf,
        #[source]
        error: Box<::zip::result::ZipError>,
    },
}

impl From<FsError> for ArchiveError {
    fn from(error: FsError) -> Self {
        ArchiveError::Fs(Box::new(error))
    }
}

impl ArchiveError {
    pub(crate) fn io(path: &std::path::Path, error: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.to_path_buf(),
            error: Box::new(error),
        }
    }
}
