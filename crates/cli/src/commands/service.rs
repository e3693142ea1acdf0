//! Service entry point tasks (`leecher`, `processor`).
//!
//! Responsibilities:
//! - Check the task's required variables before anything else happens.
//! - Resolve the addon version and export it with the addon name.
//! - Launch the entry point inside the activated virtual environment.
//!
//! Does NOT handle:
//! - The service's own lifecycle. It runs until it exits on its own or is
//!   interrupted by the operator.
//!
//! Invariants:
//! - Nothing is launched when the version cannot be resolved.

use anyhow::{Context, Result};
use ftrack_services_config::constants::{ADDON_NAME, ADDON_NAME_VAR, ADDON_VERSION_VAR};
use ftrack_services_config::{Config, resolve_version};

use crate::cancellation::CancellationToken;
use crate::error::ExitCode;
use crate::launch;
use crate::runtime_env::VirtualEnv;
use crate::tasks::{self, Launch, TaskDescriptor};

/// Run the service entry point named by `task`.
///
/// Fails with `TaskError::UnknownTask` when `task` does not launch a service.
pub async fn run(
    config: &Config,
    task: &TaskDescriptor,
    cancel: &CancellationToken,
) -> Result<ExitCode> {
    let Launch::Service { entry_point } = task.launch else {
        return Err(tasks::unknown_task(task.name).into());
    };
    task.check_required_env(&config.env)?;

    let version = resolve_version(&config.version_file)
        .context("Failed to resolve addon version")?;

    let venv = VirtualEnv::new(&config.venv_dir);
    let mut activated = venv.activate(&config.env)?;
    activated.set_var(ADDON_NAME_VAR, ADDON_NAME);
    activated.set_var(ADDON_VERSION_VAR, version.as_str());

    tracing::info!(
        task = task.name,
        addon = ADDON_NAME,
        version = %version,
        "starting service"
    );
    let mut command = activated.python_command(&config.services_dir);
    command.arg(config.services_path(entry_point));

    Ok(launch::run(command, cancel).await?)
}
