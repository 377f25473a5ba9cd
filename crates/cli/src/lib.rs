mod app;
pub mod commands;
pub mod enums;
mod logging;
mod session;

pub use app::*;
pub use logging::*;
pub use session::*;

use nodekit_packager::PackagerTarget;

/// Run the parsed command, returning the exit code to mirror.
pub async fn run_cli(app: App) -> miette::Result<i32> {
    let session = CliSession::load(&app)?;

    match app.command {
        Commands::Setup => commands::setup::setup(session).await,
        Commands::Install {
            force,
            process,
            passthrough,
        } => commands::install::install(session, force, process, passthrough).await,
        Commands::Node {
            script,
            options,
            process,
            passthrough,
        } => commands::node::node(session, script, options, process, passthrough).await,
        Commands::Npm(args) => commands::exec::exec(session, PackagerTarget::Npm, args).await,
        Commands::Npx(args) => commands::exec::exec(session, PackagerTarget::Npx, args).await,
        Commands::Packager(args) => {
            commands::exec::exec(session, PackagerTarget::Packager, args).await
        }
        Commands::PackagerCli(args) => {
            commands::exec::exec(session, PackagerTarget::PackagerCli, args).await
        }
    }
}
