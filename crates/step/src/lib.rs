mod build_step;
mod exec_step;
mod setup_step;
mod step_context;
mod step_error;
mod step_runner;
mod step_state;

pub use build_step::*;
pub use exec_step::*;
pub use setup_step::*;
pub use step_context::*;
pub use step_error::*;
pub use step_runner::*;
pub use step_state::*;
