//! Dependency installation task.
//!
//! Responsibilities:
//! - Make sure the virtual environment exists.
//! - Run `pip install -r <requirements>` inside it and forward the exit code.
//!
//! Does NOT handle:
//! - Upgrading pip or the interpreter itself.

use anyhow::Result;
use ftrack_services_config::Config;

use crate::cancellation::CancellationToken;
use crate::error::{ExitCode, TaskError};
use crate::launch;
use crate::runtime_env::VirtualEnv;

pub async fn run(config: &Config, cancel: &CancellationToken) -> Result<ExitCode> {
    if !config.requirements_file.is_file() {
        return Err(TaskError::RequirementsMissing {
            path: config.requirements_file.clone(),
        }
        .into());
    }

    let venv = VirtualEnv::new(&config.venv_dir);
    venv.ensure(config, cancel).await?;
    let activated = venv.activate(&config.env)?;

    tracing::info!(
        venv = %venv.root().display(),
        requirements = %config.requirements_file.display(),
        "installing service dependencies"
    );
    let mut command = activated.python_command(&config.services_dir);
    command
        .args(["-m", "pip", "install", "-r"])
        .arg(&config.requirements_file);

    Ok(launch::run(command, cancel).await?)
}
