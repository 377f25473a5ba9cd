use crate::command::{Command, EnvBehavior};
use crate::output::{Output, OutputMode};
use crate::process_error::ProcessError;
use nodekit_common::path_env_key;
use std::env;
use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command as TokioCommand};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace, warn};

#[cfg(unix)]
const TERMINATE_GRACE_PERIOD: Duration = Duration::from_secs(3);

impl Command {
    pub async fn exec_capture_output(&self) -> Result<Output, ProcessError> {
        self.exec(OutputMode::Capture).await
    }

    pub async fn exec_stream_output(&self) -> Result<Output, ProcessError> {
        self.exec(OutputMode::Stream).await
    }

    /// Spawn the process and wait for it to exit. When the cancel token fires
    /// first, the child is terminated and a cancelled error is returned.
    #[instrument(name = "exec_command", skip(self))]
    pub async fn exec(&self, mode: OutputMode) -> Result<Output, ProcessError> {
        let bin = self.get_bin_name();
        let mut command = self.create_async_command()?;

        debug!(
            command = self.get_command_line(),
            cwd = ?self.cwd,
            "Running command",
        );

        match mode {
            OutputMode::Capture => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
            OutputMode::Stream => {
                command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
        };

        let mut child = command.spawn().map_err(|error| ProcessError::Spawn {
            bin: bin.clone(),
            error: Box::new(error),
        })?;

        let stdout = read_pipe(child.stdout.take());
        let stderr = read_pipe(child.stderr.take());

        let status = match &self.cancel_token {
            Some(token) => {
                tokio::select! {
                    status = child.wait() => status,
                    _ = token.cancelled() => {
                        terminate(&mut child, &bin).await;

                        return Err(ProcessError::Cancelled { bin });
                    }
                }
            }
            None => child.wait().await,
        };

        let map_error = |error: std::io::Error| match mode {
            OutputMode::Capture => ProcessError::Capture {
                bin: bin.clone(),
                error: Box::new(error),
            },
            OutputMode::Stream => ProcessError::Stream {
                bin: bin.clone(),
                error: Box::new(error),
            },
        };

        let status = status.map_err(map_error)?;
        let output = Output::from_status(
            status,
            join_pipe(stdout).await.map_err(map_error)?,
            join_pipe(stderr).await.map_err(map_error)?,
        );

        debug!(
            command = bin,
            exit_code = output.exit_code,
            "Command finished",
        );

        if self.error_on_nonzero && !output.success() {
            return Err(output.to_error(bin, matches!(mode, OutputMode::Capture)));
        }

        Ok(output)
    }

    fn create_async_command(&self) -> Result<TokioCommand, ProcessError> {
        let mut command = TokioCommand::new(&self.bin);
        command.args(&self.args);
        command.kill_on_drop(true);

        for (key, value) in &self.env {
            match value {
                EnvBehavior::Set(value) => {
                    command.env(key, value);
                }
                EnvBehavior::Unset => {
                    command.env_remove(key);
                }
            };
        }

        if !self.paths.is_empty() {
            let key = path_env_key();
            let current = match self.env.get(&OsString::from(key)) {
                Some(EnvBehavior::Set(value)) => Some(value.to_owned()),
                Some(EnvBehavior::Unset) => None,
                None => env::var_os(key),
            };

            let mut paths = self.paths.iter().cloned().collect::<Vec<_>>();

            if let Some(current) = current {
                paths.extend(env::split_paths(&current));
            }

            let joined = env::join_paths(paths).map_err(|error| ProcessError::InvalidPath {
                bin: self.get_bin_name(),
                error: Box::new(error),
            })?;

            trace!(path = ?joined, "Prepending paths to {key}");

            command.env(key, joined);
        }

        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        Ok(command)
    }
}

fn read_pipe<R>(pipe: Option<R>) -> Option<JoinHandle<std::io::Result<Vec<u8>>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pipe.map(|mut pipe| {
        tokio::spawn(async move {
            let mut buffer = vec![];
            pipe.read_to_end(&mut buffer).await?;

            Ok(buffer)
        })
    })
}

async fn join_pipe(
    handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
) -> std::io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle.await.map_err(std::io::Error::other)?,
        None => Ok(vec![]),
    }
}

/// Ask the child to terminate, then kill it if it does not exit in time.
async fn terminate(child: &mut Child, bin: &str) {
    debug!(command = bin, "Terminating cancelled process");

    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            if let Err(error) = crate::signal::kill(pid, crate::signal::SignalType::Terminate) {
                warn!(command = bin, "Failed to send terminate signal: {error}");
            }

            if tokio::time::timeout(TERMINATE_GRACE_PERIOD, child.wait())
                .await
                .is_ok()
            {
                return;
            }
        }
    }

    if let Err(error) = child.kill().await {
        warn!(command = bin, "Failed to kill process: {error}");
    }
}
