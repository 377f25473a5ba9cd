use crate::build_step::{BuildStep, StepOutcome};
use crate::step_context::StepContext;
use async_trait::async_trait;
use nodekit_gate::StepFiles;
use nodekit_packager::{PackagerInstaller, PackagerTarget};
use nodekit_runtime::DistributionDescriptor;
use tracing::debug;

/// Provisions the runtime.
#[derive(Debug, Default)]
pub struct SetupStep;

#[async_trait]
impl BuildStep for SetupStep {
    fn id(&self) -> &str {
        "setup"
    }

    fn files(&self, context: &StepContext) -> StepFiles {
        let spec = &context.runtime_spec;

        if !spec.download {
            return StepFiles::default();
        }

        match DistributionDescriptor::new(spec, context.platform()) {
            Ok(descriptor) => StepFiles {
                output_dirs: vec![descriptor.install_dir.to_string_lossy().to_string()],
                ..StepFiles::default()
            },
            Err(_) => StepFiles::default(),
        }
    }

    async fn identity(&self, context: &StepContext) -> miette::Result<Vec<String>> {
        let spec = &context.runtime_spec;

        Ok(vec![
            "node".into(),
            spec.version.clone(),
            context.platform().to_string(),
            spec.dist_url.clone(),
        ])
    }

    async fn run(&self, context: &StepContext) -> miette::Result<StepOutcome> {
        let runtime = context.runtime().await?;

        debug!(node = ?runtime.node_path, "Runtime is ready");

        Ok(StepOutcome::success())
    }
}

/// Installs the configured packager, when it is not bundled with the runtime.
#[derive(Debug, Default)]
pub struct PackagerSetupStep;

#[async_trait]
impl BuildStep for PackagerSetupStep {
    fn id(&self) -> &str {
        "packager-setup"
    }

    fn files(&self, context: &StepContext) -> StepFiles {
        if context.packager.is_builtin() || context.packager.npm_package.is_none() {
            return StepFiles::default();
        }

        StepFiles {
            output_dirs: vec![
                context
                    .packager
                    .install_dir()
                    .to_string_lossy()
                    .to_string(),
            ],
            ..StepFiles::default()
        }
    }

    async fn identity(&self, context: &StepContext) -> miette::Result<Vec<String>> {
        let packager = &context.packager;

        Ok(vec![
            packager.name.clone(),
            packager
                .package_specifier()
                .unwrap_or_else(|| packager.command.clone()),
        ])
    }

    async fn run(&self, context: &StepContext) -> miette::Result<StepOutcome> {
        let resolver = context.resolver().await?;
        let packager = resolver.resolve(PackagerTarget::Packager).await?;

        debug!(
            packager = %packager.name,
            executable = ?packager.executable,
            installed = PackagerInstaller::get_binary_path(resolver.runtime(), resolver.settings()).exists(),
            "Packager is ready"
        );

        Ok(StepOutcome::success())
    }
}
