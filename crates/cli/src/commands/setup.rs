use crate::session::{CliSession, exit_code_of};
use nodekit_step::{BuildStep, PackagerSetupStep, SetupStep};
use std::sync::Arc;
use tracing::instrument;

#[instrument(skip_all)]
pub async fn setup(session: CliSession) -> miette::Result<i32> {
    let runner = session.create_runner(false)?;

    // Packager setup waits for the shared runtime provisioning
    let results = runner
        .run_all(vec![
            Arc::new(SetupStep) as Arc<dyn BuildStep>,
            Arc::new(PackagerSetupStep),
        ])
        .await?;

    Ok(exit_code_of(&results))
}
