use nodekit_process::Command;
use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;

/// How a packager identity was resolved. Decided once, never re-inspected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PackagerKind {
    /// `npm` or `npx` bundled with the runtime.
    Builtin,
    /// The CLI companion of a packager, like `pnpx`.
    CliWrapper,
    /// A packager installed from `npmPackage`, or found on `PATH`.
    Custom,
}

impl fmt::Display for PackagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Builtin => "builtin",
                Self::CliWrapper => "cli-wrapper",
                Self::Custom => "custom",
            }
        )
    }
}

/// A concrete command ready to be turned into a process.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCommand {
    pub kind: PackagerKind,
    pub name: String,
    pub executable: PathBuf,
    /// Arguments placed before the caller's, like the `npm-cli.js` script.
    pub base_args: Vec<String>,
    pub working_dir: PathBuf,
    /// Prepended to `PATH`, so nested `node` calls use the same runtime.
    pub paths: Vec<PathBuf>,
}

impl ResolvedCommand {
    pub fn to_command<I, A>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.executable);
        command
            .args(&self.base_args)
            .args(args)
            .cwd(&self.working_dir)
            .prepend_paths(&self.paths);
        command
    }

    /// Identity of the command for fingerprinting.
    pub fn identity<I, A>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let mut identity = vec![self.executable.to_string_lossy().to_string()];
        identity.extend(self.base_args.iter().cloned());
        identity.extend(
            args.into_iter()
                .map(|arg| arg.as_ref().to_string_lossy().to_string()),
        );
        identity
    }
}
