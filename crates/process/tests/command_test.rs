use nodekit_process::{Command, OutputMode, ProcessError};
use starbase_sandbox::create_empty_sandbox;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn returns_spawn_error_for_missing_executable() {
    let sandbox = create_empty_sandbox();
    let error = Command::new(sandbox.path().join("does-not-exist"))
        .exec_capture_output()
        .await
        .unwrap_err();

    assert!(matches!(error, ProcessError::Spawn { .. }));
    assert_eq!(error.exit_code(), None);
}

#[cfg(unix)]
mod unix {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.args(["-c", script]);
        command
    }

    #[tokio::test]
    async fn captures_output() {
        let output = sh("echo out; echo err >&2")
            .exec_capture_output()
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout_string(), "out");
        assert_eq!(output.stderr_string(), "err");
    }

    #[tokio::test]
    async fn streams_without_capturing() {
        let output = sh("echo streamed").exec_stream_output().await.unwrap();

        assert!(output.success());
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn maps_nonzero_exit_to_error_with_output() {
        let error = sh("echo broken >&2; exit 7")
            .exec_capture_output()
            .await
            .unwrap_err();

        assert_eq!(error.exit_code(), Some(7));

        match error {
            ProcessError::ExitNonZeroWithOutput { code, output, .. } => {
                assert_eq!(code, 7);
                assert!(output.contains("broken"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn streamed_nonzero_exit_has_no_output() {
        let error = sh("exit 3")
            .exec(OutputMode::Stream)
            .await
            .unwrap_err();

        assert!(matches!(error, ProcessError::ExitNonZero { code: 3, .. }));
    }

    #[tokio::test]
    async fn can_return_nonzero_output() {
        let output = sh("exit 2")
            .set_error_on_nonzero(false)
            .exec_capture_output()
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.code(), 2);
    }

    #[tokio::test]
    async fn applies_env_overrides() {
        let output = sh("echo $NODEKIT_TEST_VALUE")
            .env("NODEKIT_TEST_VALUE", "overridden")
            .exec_capture_output()
            .await
            .unwrap();

        assert_eq!(output.stdout_string(), "overridden");
    }

    #[tokio::test]
    async fn removes_env_vars() {
        let output = sh("echo \"[$HOME]\"")
            .env_remove("HOME")
            .exec_capture_output()
            .await
            .unwrap();

        assert_eq!(output.stdout_string(), "[]");
    }

    #[tokio::test]
    async fn prepends_paths() {
        let sandbox = create_empty_sandbox();
        let output = sh("echo $PATH")
            .prepend_paths([sandbox.path().join("bin")])
            .exec_capture_output()
            .await
            .unwrap();

        assert!(
            output
                .stdout_string()
                .starts_with(sandbox.path().join("bin").to_str().unwrap())
        );
    }

    #[tokio::test]
    async fn runs_in_working_dir() {
        let sandbox = create_empty_sandbox();
        sandbox.create_file("marker.txt", "");

        let output = sh("ls")
            .cwd(sandbox.path())
            .exec_capture_output()
            .await
            .unwrap();

        assert!(output.stdout_string().contains("marker.txt"));
    }

    #[tokio::test]
    async fn terminates_child_when_cancelled() {
        let token = CancellationToken::new();
        let canceller = token.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let error = sh("sleep 30")
            .cancel_with(token)
            .exec_capture_output()
            .await
            .unwrap_err();

        assert!(matches!(error, ProcessError::Cancelled { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn formats_command_line() {
        let mut command = Command::new("npm");
        command.args(["run", "build it"]);

        assert_eq!(command.get_command_line(), "npm run \"build it\"");
    }
}
