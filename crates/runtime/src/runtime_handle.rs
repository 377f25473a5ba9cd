use nodekit_platform::PlatformKey;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuntimeSource {
    /// Downloaded and extracted into the runtime cache.
    Downloaded,
    /// Found on `PATH`.
    System,
}

/// Location of a ready-to-use runtime.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuntimeHandle {
    pub source: RuntimeSource,
    pub platform: PlatformKey,
    pub version: String,

    /// Directory containing the `node` executable.
    pub bin_dir: PathBuf,
    pub node_path: PathBuf,

    /// For downloaded runtimes these are the bundled `npm-cli.js` and
    /// `npx-cli.js` scripts, which must be run with `node`. For system
    /// runtimes they are the `npm` and `npx` executables.
    pub npm_path: PathBuf,
    pub npx_path: PathBuf,
}

impl RuntimeHandle {
    pub fn is_downloaded(&self) -> bool {
        matches!(self.source, RuntimeSource::Downloaded)
    }
}
