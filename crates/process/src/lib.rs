mod args;
mod command;
mod exec_command;
mod output;
mod process_error;
mod signal;

pub use args::*;
pub use command::*;
pub use output::*;
pub use process_error::*;
pub use signal::*;
