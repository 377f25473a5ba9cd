use crate::config_struct;
use schematic::Config;
use std::path::PathBuf;

config_struct!(
    /// Configures the Node.js runtime.
    #[derive(Config)]
    pub struct NodeConfig {
        /// Command to run when using a system-installed runtime.
        #[setting(default = "node")]
        pub command: String,

        /// Download and install the runtime, instead of using the one on `PATH`.
        #[setting(default = true, env = "NODEKIT_NODE_DOWNLOAD")]
        pub download: bool,

        /// Base URL that distribution archives are downloaded from.
        #[setting(default = "https://nodejs.org/dist", env = "NODEKIT_NODE_DIST_URL")]
        pub dist_url: String,

        /// Verify downloaded archives against the published checksums.
        #[setting(default = true)]
        pub verify_checksum: bool,

        /// The version of Node.js to provision.
        #[setting(default = "18.16.0", env = "NODEKIT_NODE_VERSION")]
        pub version: String,

        /// Root of the downloaded runtime cache. Defaults to `.nodekit/node`.
        pub working_dir: Option<PathBuf>,
    }
);
