use miette::Diagnostic;
use nodekit_common::{Style, Stylize};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum StepError {
    #[diagnostic(code(step::cancelled))]
    #[error("Step {} was cancelled.", .id.style(Style::Id))]
    Cancelled { id: String },

    #[diagnostic(code(step::failed))]
    #[error(
        "Step {} failed with a {} exit code.",
        .id.style(Style::Id),
        .code.style(Style::Symbol),
    )]
    Failed { id: String, code: i32 },

    #[diagnostic(code(step::panicked))]
    #[error("Step {} panicked: {error}", .id.style(Style::Id))]
    Panicked { id: String, error: String },
}
