use crate::config_error::ConfigError;
use crate::workspace_config::WorkspaceConfig;
use nodekit_common::color;
use nodekit_common::consts::CONFIG_FILE_NAME;
use schematic::{ConfigLoader as BaseLoader, Format};
use std::path::Path;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `nodekit.yml` from the workspace root. A missing file
    /// results in the default configuration.
    #[instrument(skip(self))]
    pub fn load_workspace_config(&self, workspace_root: &Path) -> miette::Result<WorkspaceConfig> {
        self.load_workspace_config_from_path(workspace_root.join(CONFIG_FILE_NAME))
    }

    pub fn load_workspace_config_from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> miette::Result<WorkspaceConfig> {
        let path = path.as_ref();
        let mut loader = BaseLoader::<WorkspaceConfig>::new();

        if path.exists() {
            debug!("Loading configuration from {}", color::path(path));

            loader.file(path)?;
        } else {
            debug!(
                "No configuration found at {}, using defaults",
                color::path(path)
            );
        }

        let config = loader.load()?.config;

        validate(&config)?;

        Ok(config)
    }

    pub fn parse_workspace_config(&self, code: &str) -> miette::Result<WorkspaceConfig> {
        let config = BaseLoader::<WorkspaceConfig>::new()
            .code(code, Format::Yaml)?
            .load()?
            .config;

        validate(&config)?;

        Ok(config)
    }
}

fn validate(config: &WorkspaceConfig) -> Result<(), ConfigError> {
    if config.runner.concurrency == 0 {
        return Err(ConfigError::InvalidConcurrency);
    }

    Ok(())
}
