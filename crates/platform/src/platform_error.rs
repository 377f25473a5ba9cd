use miette::Diagnostic;
use nodekit_common::{Style, Stylize};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum PlatformError {
    #[diagnostic(code(platform::unsupported_os))]
    #[error(
        "Node.js does not provide distributions for the {} operating system.",
        .0.style(Style::Symbol),
    )]
    UnsupportedOs(String),

    #[diagnostic(code(platform::unsupported_arch))]
    #[error(
        "Node.js does not provide distributions for the {} architecture on {}.",
        .arch.style(Style::Symbol),
        .os.style(Style::Symbol),
    )]
    UnsupportedArch { os: String, arch: String },
}
