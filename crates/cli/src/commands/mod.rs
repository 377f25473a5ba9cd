pub mod exec;
pub mod install;
pub mod node;
pub mod setup;
