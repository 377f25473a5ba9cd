use crate::app::App;
use nodekit_cache::CacheEngine;
use nodekit_common::color;
use nodekit_config::{ConfigLoader, WorkspaceConfig};
use nodekit_step::{StepContext, StepResult, StepRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// State for a single invocation of the binary.
pub struct CliSession {
    pub config: WorkspaceConfig,
    pub concurrency: usize,
    pub workspace_root: PathBuf,
}

impl CliSession {
    pub fn load(app: &App) -> miette::Result<CliSession> {
        let workspace_root = absolute(&app.root)?;

        debug!("Using workspace root {}", color::path(&workspace_root));

        let config = match &app.config {
            Some(path) => ConfigLoader.load_workspace_config_from_path(absolute(path)?)?,
            None => ConfigLoader.load_workspace_config(&workspace_root)?,
        };

        let concurrency = app
            .concurrency
            .unwrap_or(config.runner.concurrency)
            .max(1);

        Ok(CliSession {
            config,
            concurrency,
            workspace_root,
        })
    }

    pub fn create_runner(&self, force: bool) -> miette::Result<StepRunner> {
        let context = StepContext::new(&self.workspace_root, &self.config)?;

        Ok(StepRunner::new(Arc::new(context), CacheEngine::new(&self.workspace_root)?)
            .set_concurrency(self.concurrency)
            .set_force(force))
    }
}

fn absolute(path: &Path) -> miette::Result<PathBuf> {
    std::path::absolute(path).map_err(|error| {
        miette::miette!("Failed to resolve {}: {error}", color::path(path))
    })
}

/// Exit code for a batch of results, the first failure wins.
pub fn exit_code_of(results: &[StepResult]) -> i32 {
    results
        .iter()
        .map(|result| result.exit_code())
        .find(|code| *code != 0)
        .unwrap_or(0)
}
