pub const CONFIG_DIRNAME: &str = ".nodekit";

pub const CONFIG_FILE_NAME: &str = "nodekit.yml";

pub const DEFAULT_NODE_VERSION: &str = "18.16.0";

pub const DEFAULT_DIST_URL: &str = "https://nodejs.org/dist";

pub const CHECKSUMS_FILE_NAME: &str = "SHASUMS256.txt";

pub const DEFAULT_CONCURRENCY: usize = 4;
