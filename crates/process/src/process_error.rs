use miette::Diagnostic;
use nodekit_common::{Style, Stylize};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ProcessError {
    #[diagnostic(code(process::capture::failed))]
    #[error("Failed to execute {} and capture output.", .bin.style(Style::Shell))]
    Capture {
        bin: String,
        #[source]
        error: Box<std::io::Error>,
    },

    #[diagnostic(code(process::cancelled))]
    #[error("Process {} was cancelled and has been terminated.", .bin.style(Style::Shell))]
    Cancelled { bin: String },

    #[diagnostic(code(process::failed))]
    #[error(
        "Process {} failed with a {} exit code.",
        .bin.style(Style::Shell),
        .code.style(Style::Symbol),
    )]
    ExitNonZero { bin: String, code: i32 },

    #[diagnostic(code(process::failed))]
    #[error(
        "Process {} failed with a {} exit code. {}",
        .bin.style(Style::Shell),
        .code.style(Style::Symbol),
        .output.style(Style::MutedLight),
    )]
    ExitNonZeroWithOutput {
        bin: String,
        code: i32,
        output: String,
    },

    #[diagnostic(code(process::invalid_path))]
    #[error("Failed to build {} for {}.", "PATH".style(Style::Symbol), .bin.style(Style::Shell))]
    InvalidPath {
        bin: String,
        #[source]
        error: Box<std::env::JoinPathsError>,
    },

    #[diagnostic(
        code(process::spawn::failed),
        help("Is the executable installed and available?")
    )]
    #[error("Failed to spawn process {}.", .bin.style(Style::Shell))]
    Spawn {
        bin: String,
        #[source]
        error: Box<std::io::Error>,
    },

    #[diagnostic(code(process::stream::failed))]
    #[error("Failed to execute {} and stream output.", .bin.style(Style::Shell))]
    Stream {
        bin: String,
        #[source]
        error: Box<std::io::Error>,
    },
}

impl ProcessError {
    /// Exit code of the child when it ran and failed.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitNonZero { code, .. } | Self::ExitNonZeroWithOutput { code, .. } => {
                Some(*code)
            }
            _ => None,
        }
    }
}
