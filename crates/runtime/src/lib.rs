mod checksum;
mod distribution;
mod downloader;
mod extractor;
mod provisioner;
mod retry;
mod runtime_error;
mod runtime_handle;
mod runtime_spec;
mod system_runtime;

pub use checksum::*;
pub use distribution::*;
pub use downloader::*;
pub use extractor::*;
pub use provisioner::*;
pub use retry::*;
pub use runtime_error::*;
pub use runtime_handle::*;
pub use runtime_spec::*;
pub use system_runtime::*;
