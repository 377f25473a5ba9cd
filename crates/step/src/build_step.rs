use crate::step_context::StepContext;
use async_trait::async_trait;
use nodekit_gate::StepFiles;

/// What a step reports after running.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StepOutcome {
    pub exit_code: i32,
    /// Only collected when output is captured.
    pub stdout: String,
}

impl StepOutcome {
    pub fn success() -> Self {
        StepOutcome::default()
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A unit of work a host can schedule: an id, declared files for the
/// incremental gate, and the work itself.
#[async_trait]
pub trait BuildStep: Send + Sync {
    fn id(&self) -> &str;

    /// Files used to decide if the step is up to date. Steps without
    /// declared outputs always run.
    fn files(&self, _context: &StepContext) -> StepFiles {
        StepFiles::default()
    }

    /// Identity of what the step runs. A change forces a re-run.
    async fn identity(&self, context: &StepContext) -> miette::Result<Vec<String>>;

    async fn run(&self, context: &StepContext) -> miette::Result<StepOutcome>;
}
