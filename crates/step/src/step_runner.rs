use crate::build_step::BuildStep;
use crate::step_context::StepContext;
use crate::step_error::StepError;
use crate::step_state::StepState;
use nodekit_cache::CacheEngine;
use nodekit_common::consts::DEFAULT_CONCURRENCY;
use nodekit_gate::{GateDecision, IncrementalGate, StaleReason};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepStatus {
    Passed,
    Failed { exit_code: i32 },
    Skipped,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepResult {
    pub id: String,
    pub status: StepStatus,
    pub stdout: String,
}

impl StepResult {
    pub fn exit_code(&self) -> i32 {
        match self.status {
            StepStatus::Failed { exit_code } => exit_code,
            _ => 0,
        }
    }
}

/// Runs steps with at most `concurrency` in flight, skipping those the
/// incremental gate considers up to date.
pub struct StepRunner {
    cache: Arc<CacheEngine>,
    concurrency: usize,
    context: Arc<StepContext>,
    force: bool,
    gate: Arc<IncrementalGate>,
}

impl StepRunner {
    pub fn new(context: Arc<StepContext>, cache: CacheEngine) -> Self {
        StepRunner {
            cache: Arc::new(cache),
            concurrency: DEFAULT_CONCURRENCY,
            gate: Arc::new(IncrementalGate::new(&context.workspace_root)),
            context,
            force: false,
        }
    }

    pub fn set_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run steps even when they are up to date.
    pub fn set_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Run a single step to completion. Ctrl+C cancels the step.
    pub async fn run(&self, step: &dyn BuildStep) -> miette::Result<StepResult> {
        let signal_handle = monitor_signals(self.context.cancel_token.clone());
        let result = run_step(
            step,
            &self.context,
            &self.cache,
            &self.gate,
            self.force,
        )
        .await;

        signal_handle.abort();

        result
    }

    /// Run independent steps in parallel, returning results in the order
    /// the steps were given. Ctrl+C cancels all in-flight steps.
    #[instrument(skip_all, fields(steps = steps.len()))]
    pub async fn run_all(
        &self,
        steps: Vec<Arc<dyn BuildStep>>,
    ) -> miette::Result<Vec<StepResult>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let signal_handle = monitor_signals(self.context.cancel_token.clone());
        let mut handles: Vec<(String, JoinHandle<miette::Result<StepResult>>)> = vec![];

        debug!(concurrency = self.concurrency, "Running steps");

        for step in steps {
            let id = step.id().to_owned();
            let semaphore = Arc::clone(&semaphore);
            let context = Arc::clone(&self.context);
            let cache = Arc::clone(&self.cache);
            let gate = Arc::clone(&self.gate);
            let force = self.force;

            handles.push((
                id,
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|error| miette::miette!("{error}"))?;

                    run_step(step.as_ref(), &context, &cache, &gate, force).await
                }),
            ));
        }

        let mut results = vec![];
        let mut first_error = None;

        for (id, handle) in handles {
            match handle.await {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(error)) => {
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
                Err(error) => {
                    if first_error.is_none() {
                        first_error = Some(
                            StepError::Panicked {
                                id,
                                error: error.to_string(),
                            }
                            .into(),
                        );
                    }
                }
            }
        }

        signal_handle.abort();

        match first_error {
            Some(error) => Err(error),
            None => Ok(results),
        }
    }
}

fn monitor_signals(cancel_token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Listening for ctrl+c signal");

        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Received ctrl+c signal, shutting down!");

            cancel_token.cancel();
        }
    })
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}

#[instrument(skip_all, fields(step = step.id()))]
async fn run_step(
    step: &dyn BuildStep,
    context: &StepContext,
    cache: &CacheEngine,
    gate: &IncrementalGate,
    force: bool,
) -> miette::Result<StepResult> {
    let id = step.id().to_owned();

    if context.is_cancelled() {
        return Err(StepError::Cancelled { id }.into());
    }

    let files = step.files(context);
    let identity = step.identity(context).await?;
    let mut state = cache.cache_state::<StepState>(&id)?;

    if force {
        debug!("Forced, bypassing the incremental gate");
    } else {
        let current = gate.fingerprint(identity.clone(), &files)?;

        match gate.check(&current, &files, state.data.fingerprint.as_ref())? {
            GateDecision::UpToDate => {
                debug!("Step is up to date, skipping");

                return Ok(StepResult {
                    id,
                    status: StepStatus::Skipped,
                    stdout: String::new(),
                });
            }
            GateDecision::Stale(StaleReason::NoOutputs) => {}
            GateDecision::Stale(reason) => {
                debug!("Step is not up to date, {reason}");
            }
        }
    }

    let outcome = match step.run(context).await {
        Ok(outcome) => outcome,
        Err(error) => {
            // A failed run must not leave an older fingerprint behind
            state.data.fingerprint = None;
            state.data.exit_code = -1;
            state.data.last_run_time = now_millis();

            if let Err(save_error) = state.save() {
                warn!("Failed to save step state: {save_error}");
            }

            return Err(error);
        }
    };

    state.data.exit_code = outcome.exit_code;
    state.data.last_run_time = now_millis();

    let status = if outcome.is_success() {
        state.data.fingerprint = Some(gate.fingerprint(identity, &files)?);

        StepStatus::Passed
    } else {
        state.data.fingerprint = None;

        StepStatus::Failed {
            exit_code: outcome.exit_code,
        }
    };

    state.save()?;

    Ok(StepResult {
        id,
        status,
        stdout: outcome.stdout,
    })
}
