use crate::enums::LogLevel;
use clap::{Args, Parser, Subcommand};
use nodekit_step::ExecStep;
use std::path::PathBuf;

fn parse_env_var(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got `{value}`")),
    }
}

/// Options shared by every command that runs a process.
#[derive(Args, Clone, Debug, Default)]
pub struct ProcessArgs {
    #[arg(
        long = "env",
        value_name = "KEY=VALUE",
        value_parser = parse_env_var,
        help = "Set an environment variable for the process, can be repeated"
    )]
    pub env: Vec<(String, String)>,

    #[arg(long, help = "Working directory of the process, relative to the root")]
    pub cwd: Option<PathBuf>,

    #[arg(long, help = "Exit successfully even when the process fails")]
    pub ignore_exit_code: bool,
}

impl ProcessArgs {
    pub fn apply_to(self, step: ExecStep) -> ExecStep {
        let step = step
            .envs(self.env)
            .set_ignore_exit_code(self.ignore_exit_code);

        match self.cwd {
            Some(cwd) => step.set_working_dir(cwd),
            None => step,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ExecArgs {
    #[arg(long, help = "Subcommand to run, like `install` or `run`")]
    pub cmd: String,

    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Arguments for the subcommand, separated by spaces"
    )]
    pub args: Option<String>,

    #[arg(long, help = "Run even when inputs and outputs are unchanged")]
    pub force: bool,

    #[command(flatten)]
    pub process: ProcessArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(
        name = "setup",
        about = "Provision the Node.js runtime and install the configured packager."
    )]
    Setup,

    #[command(
        name = "install",
        about = "Install dependencies with the configured packager."
    )]
    Install {
        #[arg(long, help = "Run even when inputs and outputs are unchanged")]
        force: bool,

        #[command(flatten)]
        process: ProcessArgs,

        #[arg(last = true, help = "Arguments passed to the install command")]
        passthrough: Vec<String>,
    },

    #[command(name = "node", about = "Run a script with the provisioned runtime.")]
    Node {
        #[arg(long, help = "Script file to run")]
        script: String,

        #[arg(
            long,
            allow_hyphen_values = true,
            help = "Options for node itself, placed before the script"
        )]
        options: Option<String>,

        #[command(flatten)]
        process: ProcessArgs,

        #[arg(last = true, help = "Arguments passed to the script")]
        passthrough: Vec<String>,
    },

    #[command(name = "npm", about = "Run npm bundled with the runtime.")]
    Npm(ExecArgs),

    #[command(name = "npx", about = "Run npx bundled with the runtime.")]
    Npx(ExecArgs),

    #[command(name = "packager", about = "Run the configured packager.")]
    Packager(ExecArgs),

    #[command(
        name = "packager-cli",
        about = "Run the CLI companion of the configured packager, like pnpx."
    )]
    PackagerCli(ExecArgs),
}

#[derive(Debug, Parser)]
#[command(
    bin_name = "nodekit",
    name = "nodekit",
    about = "Provision Node.js and run package managers as incremental build steps.",
    version
)]
pub struct App {
    #[arg(long, global = true, help = "Workspace root", default_value = ".")]
    pub root: PathBuf,

    #[arg(long, global = true, help = "Path to the configuration file")]
    pub config: Option<PathBuf>,

    #[arg(
        value_enum,
        long,
        global = true,
        help = "Lowest log level to output",
        default_value_t
    )]
    pub log: LogLevel,

    #[arg(long, global = true, help = "Maximum number of steps to run in parallel")]
    pub concurrency: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}
