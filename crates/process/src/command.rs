use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug, PartialEq)]
pub enum EnvBehavior {
    /// Always set and overwrite system var
    Set(OsString),

    /// Unset system var and don't inherit
    Unset,
}

/// A request to execute a binary. Built fresh for each invocation.
#[derive(Clone, Debug)]
pub struct Command {
    pub args: Vec<OsString>,

    pub bin: OsString,

    /// Token that terminates the child process when cancelled
    pub cancel_token: Option<CancellationToken>,

    pub cwd: Option<PathBuf>,

    /// Overrides applied on top of the inherited environment
    pub env: FxHashMap<OsString, EnvBehavior>,

    /// Convert non-zero exits to errors
    pub error_on_nonzero: bool,

    /// Paths to prepend to `PATH`
    pub paths: VecDeque<PathBuf>,
}

impl Command {
    pub fn new<T: AsRef<OsStr>>(bin: T) -> Self {
        Command {
            args: vec![],
            bin: bin.as_ref().to_os_string(),
            cancel_token: None,
            cwd: None,
            env: FxHashMap::default(),
            error_on_nonzero: true,
            paths: VecDeque::new(),
        }
    }

    pub fn arg<A: AsRef<OsStr>>(&mut self, arg: A) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, A>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        for arg in args {
            self.arg(arg);
        }

        self
    }

    pub fn cancel_with(&mut self, token: CancellationToken) -> &mut Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn cwd<P: AsRef<Path>>(&mut self, dir: P) -> &mut Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.env.insert(
            key.as_ref().to_os_string(),
            EnvBehavior::Set(value.as_ref().to_os_string()),
        );
        self
    }

    pub fn env_remove<K: AsRef<OsStr>>(&mut self, key: K) -> &mut Self {
        self.env
            .insert(key.as_ref().to_os_string(), EnvBehavior::Unset);
        self
    }

    pub fn envs<I, K, V>(&mut self, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        for (k, v) in vars {
            self.env(k, v);
        }

        self
    }

    pub fn prepend_paths<I, V>(&mut self, list: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<Path>,
    {
        let paths = list
            .into_iter()
            .map(|path| path.as_ref().to_path_buf())
            .collect::<Vec<_>>();

        for path in paths.into_iter().rev() {
            self.paths.push_front(path);
        }

        self
    }

    pub fn set_error_on_nonzero(&mut self, state: bool) -> &mut Self {
        self.error_on_nonzero = state;
        self
    }

    pub fn get_args_list(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect()
    }

    pub fn get_bin_name(&self) -> String {
        self.bin.to_string_lossy().to_string()
    }

    /// Human readable command line, for logs and errors.
    pub fn get_command_line(&self) -> String {
        let mut line = vec![self.get_bin_name()];

        for arg in self.get_args_list() {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                line.push(format!("\"{arg}\""));
            } else {
                line.push(arg);
            }
        }

        line.join(" ")
    }
}
