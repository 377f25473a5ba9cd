mod fingerprint;
mod gate;
mod gate_error;

pub use fingerprint::*;
pub use gate::*;
pub use gate_error::*;
