use crate::app::ProcessArgs;
use crate::session::CliSession;
use nodekit_process::split_args;
use nodekit_step::ExecStep;
use tracing::instrument;

#[instrument(skip(session))]
pub async fn node(
    session: CliSession,
    script: String,
    options: Option<String>,
    process: ProcessArgs,
    args: Vec<String>,
) -> miette::Result<i32> {
    let runner = session.create_runner(false)?;
    let options = options.as_deref().map(split_args).unwrap_or_default();
    let step = process.apply_to(ExecStep::node_with_options(options, script, args));
    let result = runner.run(&step).await?;

    Ok(result.exit_code())
}
