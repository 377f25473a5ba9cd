mod config_error;
mod loader;
mod macros;
mod node_config;
mod packager_config;
mod runner_config;
mod workspace_config;

pub use config_error::*;
pub use loader::*;
pub use node_config::*;
pub use packager_config::*;
pub use runner_config::*;
pub use workspace_config::*;
