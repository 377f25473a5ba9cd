mod host;
mod platform_error;
mod platform_key;

pub use host::*;
pub use platform_error::*;
pub use platform_key::*;
