use crate::build_step::{BuildStep, StepOutcome};
use crate::step_context::StepContext;
use async_trait::async_trait;
use nodekit_common::path::resolve_from;
use nodekit_gate::StepFiles;
use nodekit_packager::{PackagerTarget, ResolvedCommand};
use nodekit_process::output_to_string;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecTarget {
    Node,
    Packager(PackagerTarget),
}

/// Runs `node` or a package manager with arguments.
#[derive(Clone, Debug)]
pub struct ExecStep {
    id: String,
    target: ExecTarget,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    /// Only the install is gated on the packager's declared files.
    gated: bool,
    ignore_exit_code: bool,
    working_dir: Option<PathBuf>,
}

impl ExecStep {
    fn new(id: String, target: ExecTarget, args: Vec<String>) -> Self {
        ExecStep {
            id,
            target,
            args,
            env: BTreeMap::new(),
            gated: false,
            ignore_exit_code: false,
            working_dir: None,
        }
    }

    /// `node <script> [args]`
    pub fn node(script: impl AsRef<str>, args: Vec<String>) -> Self {
        Self::node_with_options(Vec::new(), script, args)
    }

    /// `node [options] <script> [args]`, where options are flags for
    /// node itself, like `--inspect`.
    pub fn node_with_options(
        options: Vec<String>,
        script: impl AsRef<str>,
        args: Vec<String>,
    ) -> Self {
        let script = script.as_ref();
        let mut all_args = options;
        all_args.push(script.to_owned());
        all_args.extend(args);

        Self::new(format!("node:{script}"), ExecTarget::Node, all_args)
    }

    /// `<packager> <command> [args]`
    pub fn packager(target: PackagerTarget, command: impl AsRef<str>, args: Vec<String>) -> Self {
        let command = command.as_ref();
        let mut all_args = vec![command.to_owned()];
        all_args.extend(args);

        Self::new(
            format!("{target}:{command}"),
            ExecTarget::Packager(target),
            all_args,
        )
    }

    /// `<packager> install [args]`, skipped while the packager's input
    /// files are unchanged and its outputs exist.
    pub fn install(args: Vec<String>) -> Self {
        let mut step = Self::packager(PackagerTarget::Packager, "install", args);
        step.id = "install".into();
        step.gated = true;
        step
    }

    /// Set a variable for the child process, overriding the inherited one.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_owned(), value.as_ref().to_owned());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            self = self.env(key, value);
        }
        self
    }

    /// Report a non-zero exit as success.
    pub fn set_ignore_exit_code(mut self, state: bool) -> Self {
        self.ignore_exit_code = state;
        self
    }

    /// Run in this directory instead of the workspace root. Relative
    /// paths resolve from the workspace root.
    pub fn set_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_target(&self) -> ExecTarget {
        self.target
    }

    async fn resolve(&self, context: &StepContext) -> miette::Result<ResolvedCommand> {
        let resolver = context.resolver().await?;

        let mut resolved = match self.target {
            ExecTarget::Node => resolver.resolve_node(),
            ExecTarget::Packager(target) => resolver.resolve(target).await?,
        };

        if let Some(dir) = &self.working_dir {
            resolved.working_dir = resolve_from(&context.workspace_root, dir);
        }

        Ok(resolved)
    }
}

#[async_trait]
impl BuildStep for ExecStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn files(&self, context: &StepContext) -> StepFiles {
        if !self.gated {
            return StepFiles::default();
        }

        StepFiles {
            inputs: context.packager.input_files.clone(),
            outputs: context.packager.output_files.clone(),
            output_dirs: context.packager.output_directories.clone(),
        }
    }

    async fn identity(&self, context: &StepContext) -> miette::Result<Vec<String>> {
        let resolved = self.resolve(context).await?;
        let mut identity = resolved.identity(&self.args);

        identity.push(format!("cwd={}", resolved.working_dir.display()));
        identity.extend(self.env.iter().map(|(key, value)| format!("env:{key}={value}")));

        Ok(identity)
    }

    async fn run(&self, context: &StepContext) -> miette::Result<StepOutcome> {
        let resolved = self.resolve(context).await?;
        let mut command = resolved.to_command(&self.args);

        command
            .envs(&self.env)
            .set_error_on_nonzero(false)
            .cancel_with(context.cancel_token.clone());

        debug!(step = %self.id, command = %command.get_command_line(), "Running step");

        let output = command.exec(context.output_mode).await?;
        let mut exit_code = output.exit_code;

        if exit_code != 0 && self.ignore_exit_code {
            warn!(step = %self.id, exit_code, "Ignoring non-zero exit code");

            exit_code = 0;
        }

        Ok(StepOutcome {
            exit_code,
            stdout: output_to_string(&output.stdout),
        })
    }
}
