//! Task dispatch logic.
//!
//! Responsibilities:
//! - Route the parsed task to its handler through the static task table.
//! - Log the start of every task.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).
//!
//! Invariants:
//! - No task name reaching this point is unknown: clap rejects unknown names
//!   before dispatch.
//! - Every task receives the same read-only `Config`.

use anyhow::Result;
use ftrack_services_config::Config;

use crate::args::{Cli, Commands};
use crate::cancellation::CancellationToken;
use crate::commands;
use crate::commands::package::PackageOptions;
use crate::error::ExitCode;

/// Dispatch the parsed task and return the exit code to forward.
///
/// Running without a task behaves like `help`.
pub(crate) async fn run_command(
    cli: Cli,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<ExitCode> {
    let command = cli.command.unwrap_or(Commands::Default);
    let task = command.descriptor();
    tracing::info!(task = task.name, services_dir = %config.services_dir.display(), "starting task");

    match command {
        Commands::Help | Commands::Default => {
            commands::help::run(&mut std::io::stdout())?;
            Ok(ExitCode::Success)
        }
        Commands::Install => commands::install::run(config, cancel).await,
        Commands::Leecher | Commands::Processor => commands::service::run(config, task, cancel).await,
        Commands::Package {
            output,
            skip_zip,
            keep_sources,
        } => {
            let options = PackageOptions {
                output,
                skip_zip,
                keep_sources,
            };
            commands::package::run(config, &options, &mut std::io::stdout())
        }
    }
}
