//! ftrack services launcher.
//!
//! Responsibilities:
//! - Parse the task name and its flags.
//! - Build the Configuration Set from the environment and `.env`.
//! - Run the task and exit with its structured exit code.
//!
//! Does NOT handle:
//! - The services themselves (they are Python processes launched by tasks).
//!
//! Invariants:
//! - Unknown task names exit with code 2 before any configuration is loaded.
//! - The banner tasks always succeed; a configuration failure is only a warning there.
//! - The launcher never writes to its own process environment.
//! - Logs go to stderr so the task's stdout stays clean.

mod args;
mod cancellation;
mod commands;
mod dispatch;
mod error;
mod launch;
mod runtime_env;
mod tasks;

use args::{Cli, Commands};
use cancellation::{CancellationToken, install_ctrl_c_handler};
use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use ftrack_services_config::constants::{DEFAULT_LOG_FILTER, LOG_FILTER_VAR};
use ftrack_services_config::{ConfigLoader, ConfigSet};
use tasks::Launch;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => {
            let name = match e.get(ContextKind::InvalidSubcommand) {
                Some(ContextValue::String(name)) => name.clone(),
                _ => String::new(),
            };
            eprintln!("{}", tasks::unknown_task(name));
            std::process::exit(ExitCode::UnknownTask.as_i32());
        }
        Err(e) => e.exit(),
    };

    let task = cli.command.as_ref().map_or(&tasks::DEFAULT, Commands::descriptor);

    let config = match ConfigLoader::new()
        .load_dotenv()
        .and_then(ConfigLoader::build)
    {
        Ok(config) => config,
        Err(e) if task.launch == Launch::Banner => {
            init_tracing(&ConfigSet::default());
            tracing::warn!("Failed to load environment: {}", e);
            let code = match commands::help::run(&mut std::io::stdout()) {
                Ok(()) => ExitCode::Success,
                Err(e) => {
                    eprintln!("{:#}", e);
                    e.exit_code()
                }
            };
            std::process::exit(code.as_i32());
        }
        Err(e) => {
            eprintln!("Failed to load environment: {}", e);
            std::process::exit(ExitCode::ConfigError.as_i32());
        }
    };

    init_tracing(&config.env);
    for key in &config.non_unicode_env {
        tracing::debug!(key = %key, "non-unicode environment variable not passed to tasks");
    }

    let cancel = CancellationToken::new();
    if let Err(e) = install_ctrl_c_handler(&cancel) {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
    }

    let exit_code = match run_command(cli, &config, &cancel).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Install the stderr subscriber, filtered by `RUST_LOG` from the Configuration Set.
fn init_tracing(env: &ConfigSet) {
    let filter = env
        .get_non_empty(LOG_FILTER_VAR)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
