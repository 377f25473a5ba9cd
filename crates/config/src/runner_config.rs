use crate::config_struct;
use schematic::Config;

config_struct!(
    /// Configures how build steps are executed.
    #[derive(Config)]
    pub struct RunnerConfig {
        /// Maximum number of steps running in parallel.
        #[setting(default = 4, env = "NODEKIT_CONCURRENCY")]
        pub concurrency: usize,

        /// Number of attempts made for each network request.
        #[setting(default = 3)]
        pub retries: u32,
    }
);
