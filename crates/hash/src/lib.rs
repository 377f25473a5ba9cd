mod file_hasher;
mod hasher;

pub use file_hasher::*;
pub use hasher::*;
