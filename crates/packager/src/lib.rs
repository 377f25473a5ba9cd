mod installer;
mod packager_error;
mod resolved_command;
mod resolver;

pub use installer::*;
pub use packager_error::*;
pub use resolved_command::*;
pub use resolver::*;
