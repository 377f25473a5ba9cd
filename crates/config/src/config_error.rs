use miette::Diagnostic;
use nodekit_common::{Style, Stylize};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[diagnostic(
        code(config::packager::missing_command),
        help("Custom packagers must declare the executable to run with `command`.")
    )]
    #[error(
        "Packager {} is configured with the {} preset but has no {}.",
        .name.style(Style::Id),
        "custom".style(Style::Symbol),
        "command".style(Style::Property),
    )]
    MissingPackagerCommand { name: String },

    #[diagnostic(code(config::runner::invalid_concurrency))]
    #[error("Runner {} must be at least 1.", "concurrency".style(Style::Property))]
    InvalidConcurrency,
}
