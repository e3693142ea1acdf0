//! Task subprocess launching.
//!
//! Responsibilities:
//! - Spawn one subprocess and wait for it to finish.
//! - Translate its exit status into the launcher's exit code.
//!
//! Does NOT handle:
//! - Composing the child environment (see `runtime_env`).
//! - Restarting or retrying children.
//!
//! Invariants:
//! - An interrupt never abandons the child: the launcher keeps waiting and
//!   reports whatever status the child ends with.
//! - A child killed by signal N reports 128 + N (Unix).

use std::process::ExitStatus;

use tokio::process::Command;

use crate::cancellation::CancellationToken;
use crate::error::{ExitCode, TaskError};

/// Run `command` to completion and return the exit code to forward.
pub async fn run(mut command: Command, cancel: &CancellationToken) -> Result<ExitCode, TaskError> {
    let program = command.as_std().get_program().to_string_lossy().into_owned();

    let mut child = command.spawn().map_err(|source| TaskError::Spawn {
        program: program.clone(),
        source,
    })?;
    tracing::info!(program = %program, pid = child.id(), "task process started");

    let mut interrupted = false;
    let status = loop {
        tokio::select! {
            status = child.wait() => break status,
            _ = cancel.cancelled(), if !interrupted => {
                interrupted = true;
                tracing::info!(program = %program, "interrupt received, waiting for task process to exit");
            }
        }
    }
    .map_err(|source| TaskError::Wait {
        program: program.clone(),
        source,
    })?;

    let code = exit_code(status, cancel.is_cancelled());
    tracing::info!(program = %program, code = code.as_i32(), "task process exited");
    Ok(code)
}

/// Map a child's exit status to the code the launcher exits with.
pub fn exit_code(status: ExitStatus, interrupted: bool) -> ExitCode {
    match status.code() {
        Some(0) => ExitCode::Success,
        Some(code) => ExitCode::Child(code),
        None => signal_exit_code(status).unwrap_or(if interrupted {
            ExitCode::Interrupted
        } else {
            ExitCode::GeneralError
        }),
    }
}

#[cfg(unix)]
fn signal_exit_code(status: ExitStatus) -> Option<ExitCode> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|signal| ExitCode::Child(128 + signal))
}

#[cfg(not(unix))]
fn signal_exit_code(_status: ExitStatus) -> Option<ExitCode> {
    None
}
