use nodekit_config::{PackagerSettings, WorkspaceConfig};
use nodekit_packager::{PackagerInstaller, PackagerResolver};
use nodekit_platform::PlatformKey;
use nodekit_process::OutputMode;
use nodekit_runtime::{Downloader, RetryPolicy, RuntimeHandle, RuntimeProvisioner, RuntimeSpec};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

/// Everything a step needs, built once from the loaded configuration and
/// shared by all steps of a run. Never mutated after construction.
pub struct StepContext {
    pub cancel_token: CancellationToken,
    pub output_mode: OutputMode,
    pub packager: PackagerSettings,
    pub runtime_spec: RuntimeSpec,
    pub workspace_root: PathBuf,

    installer: Arc<PackagerInstaller>,
    provisioner: Arc<RuntimeProvisioner>,
    runtime: OnceCell<RuntimeHandle>,
}

impl StepContext {
    pub fn new(workspace_root: &Path, config: &WorkspaceConfig) -> miette::Result<Self> {
        Self::with_platform(workspace_root, config, PlatformKey::detect()?)
    }

    pub fn with_platform(
        workspace_root: &Path,
        config: &WorkspaceConfig,
        platform: PlatformKey,
    ) -> miette::Result<Self> {
        let runtime_spec = RuntimeSpec::from_config(&config.node, workspace_root);
        let downloader = Downloader::new()
            .set_retry_policy(RetryPolicy::with_attempts(config.runner.retries))
            .set_verify_checksum(runtime_spec.verify_checksum);

        Ok(StepContext {
            cancel_token: CancellationToken::new(),
            output_mode: OutputMode::Stream,
            packager: config.resolve_packager(workspace_root)?,
            runtime_spec,
            workspace_root: workspace_root.to_path_buf(),
            installer: Arc::new(PackagerInstaller::default()),
            provisioner: Arc::new(RuntimeProvisioner::new(platform, downloader)),
            runtime: OnceCell::new(),
        })
    }

    pub fn set_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Use an already available runtime instead of provisioning one.
    pub fn set_runtime(mut self, runtime: RuntimeHandle) -> Self {
        self.runtime = OnceCell::from(runtime);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    pub fn platform(&self) -> PlatformKey {
        self.provisioner.platform()
    }

    /// Provision the runtime on first use. Concurrent callers wait for the
    /// same provisioning.
    pub async fn runtime(&self) -> miette::Result<&RuntimeHandle> {
        self.runtime
            .get_or_try_init(|| async {
                self.provisioner
                    .provision(&self.runtime_spec)
                    .await
                    .map_err(miette::Report::from)
            })
            .await
    }

    pub async fn resolver(&self) -> miette::Result<PackagerResolver> {
        let runtime = self.runtime().await?.clone();

        Ok(
            PackagerResolver::new(runtime, self.packager.clone(), &self.workspace_root)
                .with_installer(Arc::clone(&self.installer))
                .cancel_with(self.cancel_token.clone()),
        )
    }
}
