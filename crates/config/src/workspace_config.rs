use crate::config_error::ConfigError;
use crate::config_struct;
use crate::node_config::{NodeConfig, PartialNodeConfig};
use crate::packager_config::{
    PackagerConfig, PackagerPreset, PackagerSettings, PartialPackagerConfig,
};
use crate::runner_config::{PartialRunnerConfig, RunnerConfig};
use schematic::Config;
use std::path::Path;

config_struct!(
    /// Configures the workspace, loaded from `nodekit.yml`.
    #[derive(Config)]
    pub struct WorkspaceConfig {
        #[setting(nested)]
        pub node: NodeConfig,

        /// Only a single packager may be configured.
        #[setting(nested)]
        pub packager: Option<PackagerConfig>,

        #[setting(nested)]
        pub runner: RunnerConfig,
    }
);

impl WorkspaceConfig {
    /// Resolve the configured packager, falling back to the npm
    /// bundled with the runtime when none is configured.
    pub fn resolve_packager(&self, workspace_root: &Path) -> Result<PackagerSettings, ConfigError> {
        match &self.packager {
            Some(packager) => packager.resolve(workspace_root),
            None => PackagerConfig {
                preset: PackagerPreset::Npm,
                name: None,
                command: None,
                version: None,
                working_dir: None,
                npm_package: None,
                input_files: None,
                output_files: None,
                output_directories: None,
                cli: None,
            }
            .resolve(workspace_root),
        }
    }
}
