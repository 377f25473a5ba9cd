use crate::process_error::ProcessError;
use std::process::ExitStatus;

/// How the output of a child process is handled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputMode {
    /// Pipe and collect stdout/stderr into the returned output.
    #[default]
    Capture,

    /// Inherit the parent's stdout/stderr, so output is streamed live.
    Stream,
}

/// Result of a finished child process.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Output {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Output {
    pub fn from_status(status: ExitStatus, stdout: Vec<u8>, stderr: Vec<u8>) -> Output {
        Output {
            exit_code: exit_code_of(status),
            stdout,
            stderr,
        }
    }

    pub fn code(&self) -> i32 {
        self.exit_code
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_string(&self) -> String {
        output_to_trimmed_string(&self.stdout)
    }

    pub fn stderr_string(&self) -> String {
        output_to_trimmed_string(&self.stderr)
    }

    pub fn to_error(&self, bin: impl AsRef<str>, with_message: bool) -> ProcessError {
        let bin = bin.as_ref().to_owned();
        let code = self.exit_code;

        if !with_message {
            return ProcessError::ExitNonZero { bin, code };
        }

        let mut message = self.stderr_string();

        if message.is_empty() {
            message = self.stdout_string();
        }

        // Make error message nicer to look at
        if !message.is_empty() {
            message = format!("\n\n{message}");
        }

        ProcessError::ExitNonZeroWithOutput {
            bin,
            code,
            output: message,
        }
    }
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match status.code() {
        Some(code) => code,
        // Terminated by a signal, mirror the shell convention
        None => 128 + status.signal().unwrap_or_default(),
    }
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[inline]
pub fn output_to_string(data: &[u8]) -> String {
    String::from_utf8_lossy(data).to_string()
}

#[inline]
pub fn output_to_trimmed_string(data: &[u8]) -> String {
    output_to_string(data).trim().to_owned()
}
