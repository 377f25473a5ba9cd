use crate::app::ExecArgs;
use crate::session::CliSession;
use nodekit_packager::PackagerTarget;
use nodekit_process::split_args;
use nodekit_step::ExecStep;
use tracing::instrument;

#[instrument(skip(session))]
pub async fn exec(
    session: CliSession,
    target: PackagerTarget,
    args: ExecArgs,
) -> miette::Result<i32> {
    let runner = session.create_runner(args.force)?;
    let step = args.process.apply_to(ExecStep::packager(
        target,
        &args.cmd,
        args.args.as_deref().map(split_args).unwrap_or_default(),
    ));
    let result = runner.run(&step).await?;

    Ok(result.exit_code())
}
