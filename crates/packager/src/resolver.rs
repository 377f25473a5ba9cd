use crate::installer::PackagerInstaller;
use crate::packager_error::PackagerError;
use crate::resolved_command::{PackagerKind, ResolvedCommand};
use nodekit_config::PackagerSettings;
use nodekit_runtime::RuntimeHandle;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use system_env::find_command_on_path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// The package manager identities a step can ask for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PackagerTarget {
    Npm,
    Npx,
    /// The configured packager.
    Packager,
    /// The CLI companion of the configured packager.
    PackagerCli,
}

impl fmt::Display for PackagerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Npm => "npm",
                Self::Npx => "npx",
                Self::Packager => "packager",
                Self::PackagerCli => "packager-cli",
            }
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BundledTool {
    Npm,
    Npx,
}

/// Run `npm` or `npx` from the runtime. Downloaded runtimes only ship the
/// JavaScript entry points, so those are run through `node`.
pub fn bundled_tool(
    runtime: &RuntimeHandle,
    tool: BundledTool,
    working_dir: &Path,
) -> ResolvedCommand {
    let (name, path) = match tool {
        BundledTool::Npm => ("npm", &runtime.npm_path),
        BundledTool::Npx => ("npx", &runtime.npx_path),
    };

    let (executable, base_args) = if runtime.is_downloaded() {
        (
            runtime.node_path.clone(),
            vec![path.to_string_lossy().to_string()],
        )
    } else {
        (path.clone(), vec![])
    };

    ResolvedCommand {
        kind: PackagerKind::Builtin,
        name: name.to_owned(),
        executable,
        base_args,
        working_dir: working_dir.to_path_buf(),
        paths: vec![runtime.bin_dir.clone()],
    }
}

pub struct PackagerResolver {
    cancel_token: Option<CancellationToken>,
    installer: Arc<PackagerInstaller>,
    runtime: RuntimeHandle,
    settings: PackagerSettings,
    working_dir: PathBuf,
}

impl PackagerResolver {
    pub fn new(
        runtime: RuntimeHandle,
        settings: PackagerSettings,
        working_dir: impl AsRef<Path>,
    ) -> Self {
        PackagerResolver {
            cancel_token: None,
            installer: Arc::new(PackagerInstaller::default()),
            runtime,
            settings,
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    /// Share an installer, so that concurrent resolvers install once.
    pub fn with_installer(mut self, installer: Arc<PackagerInstaller>) -> Self {
        self.installer = installer;
        self
    }

    pub fn cancel_with(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    pub fn settings(&self) -> &PackagerSettings {
        &self.settings
    }

    /// Plain `node` from the runtime.
    pub fn resolve_node(&self) -> ResolvedCommand {
        ResolvedCommand {
            kind: PackagerKind::Builtin,
            name: "node".into(),
            executable: self.runtime.node_path.clone(),
            base_args: vec![],
            working_dir: self.working_dir.clone(),
            paths: vec![self.runtime.bin_dir.clone()],
        }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, target: PackagerTarget) -> Result<ResolvedCommand, PackagerError> {
        let resolved = match target {
            PackagerTarget::Npm => self.bundled(BundledTool::Npm),
            PackagerTarget::Npx => self.bundled(BundledTool::Npx),
            PackagerTarget::Packager => {
                if self.settings.is_builtin() {
                    let mut command = self.bundled(BundledTool::Npm);
                    command.name = self.settings.name.clone();
                    command
                } else {
                    self.resolve_custom(&self.settings.command, PackagerKind::Custom)
                        .await?
                }
            }
            PackagerTarget::PackagerCli => {
                let Some(cli) = &self.settings.cli_command else {
                    return Err(PackagerError::NoCliCommand {
                        name: self.settings.name.clone(),
                    });
                };

                if self.settings.is_builtin() && cli == "npx" {
                    let mut command = self.bundled(BundledTool::Npx);
                    command.kind = PackagerKind::CliWrapper;
                    command
                } else {
                    self.resolve_custom(cli, PackagerKind::CliWrapper).await?
                }
            }
        };

        debug!(
            name = %resolved.name,
            kind = %resolved.kind,
            executable = ?resolved.executable,
            "Resolved packager command"
        );

        Ok(resolved)
    }

    fn bundled(&self, tool: BundledTool) -> ResolvedCommand {
        bundled_tool(&self.runtime, tool, &self.working_dir)
    }

    async fn resolve_custom(
        &self,
        command: &str,
        kind: PackagerKind,
    ) -> Result<ResolvedCommand, PackagerError> {
        let platform = self.runtime.platform;
        let install_dir = self.settings.install_dir();
        let bin_dir = platform.bin_dir(&install_dir);
        let binary = bin_dir.join(platform.cmd_name(command));

        let executable = if binary.exists() {
            binary
        } else if self.settings.npm_package.is_some() {
            self.installer
                .install(
                    &self.runtime,
                    &self.settings,
                    &self.working_dir,
                    self.cancel_token.clone(),
                )
                .await?;

            if !binary.exists() {
                return Err(PackagerError::MissingBinary {
                    name: self.settings.name.clone(),
                    command: command.to_owned(),
                    path: binary,
                });
            }

            binary
        } else if let Some(found) = find_command_on_path(command) {
            found
        } else {
            return Err(PackagerError::NotConfigured {
                name: self.settings.name.clone(),
                command: command.to_owned(),
            });
        };

        Ok(ResolvedCommand {
            kind,
            name: command.to_owned(),
            executable,
            base_args: vec![],
            working_dir: self.working_dir.clone(),
            paths: vec![bin_dir, self.runtime.bin_dir.clone()],
        })
    }
}
