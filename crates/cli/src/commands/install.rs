use crate::app::ProcessArgs;
use crate::session::CliSession;
use nodekit_step::ExecStep;
use tracing::instrument;

#[instrument(skip(session))]
pub async fn install(
    session: CliSession,
    force: bool,
    process: ProcessArgs,
    args: Vec<String>,
) -> miette::Result<i32> {
    let runner = session.create_runner(force)?;
    let step = process.apply_to(ExecStep::install(args));
    let result = runner.run(&step).await?;

    Ok(result.exit_code())
}
