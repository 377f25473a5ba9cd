use clap::Parser;
use nodekit_cli::{App, run_cli, setup_logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> miette::Result<ExitCode> {
    let app = App::parse();

    setup_logging(app.log);

    let code = run_cli(app).await?;

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
