use async_trait::async_trait;
use nodekit_cache::{CacheEngine, CacheMode};
use nodekit_config::ConfigLoader;
use nodekit_platform::{HostArch, HostOs, PlatformKey};
use nodekit_process::OutputMode;
use nodekit_step::{
    BuildStep, StepContext, StepError, StepOutcome, StepResult, StepRunner, StepStatus,
};
use starbase_sandbox::create_empty_sandbox;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn create_context(root: &Path, yaml: &str) -> StepContext {
    let config = ConfigLoader.parse_workspace_config(yaml).unwrap();

    StepContext::with_platform(
        root,
        &config,
        PlatformKey::from_parts(HostOs::Linux, HostArch::X64),
    )
    .unwrap()
    .set_output_mode(OutputMode::Capture)
}

fn create_runner(root: &Path, context: StepContext) -> StepRunner {
    StepRunner::new(
        Arc::new(context),
        CacheEngine::with_mode(root, CacheMode::ReadWrite).unwrap(),
    )
}

/// Tracks how many instances run at the same time.
struct SleepStep {
    id: String,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

#[async_trait]
impl BuildStep for SleepStep {
    fn id(&self) -> &str {
        &self.id
    }

    async fn identity(&self, _context: &StepContext) -> miette::Result<Vec<String>> {
        Ok(vec![self.id.clone()])
    }

    async fn run(&self, _context: &StepContext) -> miette::Result<StepOutcome> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;

        self.peak.fetch_max(active, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(50)).await;

        self.active.fetch_sub(1, Ordering::SeqCst);

        Ok(StepOutcome {
            exit_code: 0,
            stdout: self.id.clone(),
        })
    }
}

#[tokio::test]
async fn bounds_parallel_steps() {
    let sandbox = create_empty_sandbox();
    let runner = create_runner(sandbox.path(), create_context(sandbox.path(), "")).set_concurrency(2);
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let steps = (0..6)
        .map(|index| {
            Arc::new(SleepStep {
                id: format!("sleep-{index}"),
                active: Arc::clone(&active),
                peak: Arc::clone(&peak),
            }) as Arc<dyn BuildStep>
        })
        .collect::<Vec<_>>();

    let results = runner.run_all(steps).await.unwrap();

    assert_eq!(peak.load(Ordering::SeqCst), 2);
    assert_eq!(
        results
            .iter()
            .map(|result| result.stdout.as_str())
            .collect::<Vec<_>>(),
        vec!["sleep-0", "sleep-1", "sleep-2", "sleep-3", "sleep-4", "sleep-5"]
    );
}

#[tokio::test]
async fn steps_without_outputs_always_run() {
    let sandbox = create_empty_sandbox();
    let runner = create_runner(sandbox.path(), create_context(sandbox.path(), ""));
    let step = SleepStep {
        id: "sleep".into(),
        active: Arc::default(),
        peak: Arc::default(),
    };

    let first = runner.run(&step).await.unwrap();
    let second = runner.run(&step).await.unwrap();

    assert_eq!(first.status, StepStatus::Passed);
    assert_eq!(second.status, StepStatus::Passed);
}

#[tokio::test]
async fn errors_when_cancelled() {
    let sandbox = create_empty_sandbox();
    let context = create_context(sandbox.path(), "");

    context.cancel_token.cancel();

    let runner = create_runner(sandbox.path(), context);
    let step = SleepStep {
        id: "sleep".into(),
        active: Arc::default(),
        peak: Arc::default(),
    };

    let error = runner.run(&step).await.unwrap_err();

    assert!(matches!(
        error.downcast_ref::<StepError>(),
        Some(StepError::Cancelled { .. })
    ));
}

#[test]
fn failed_results_report_exit_code() {
    let result = StepResult {
        id: "install".into(),
        status: StepStatus::Failed { exit_code: 7 },
        stdout: String::new(),
    };

    assert_eq!(result.exit_code(), 7);
}
