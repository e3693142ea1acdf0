//! CLI exit codes and task errors.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Define the dispatcher's own error kinds (`TaskError`).
//! - Map errors anywhere in an `anyhow` chain to an exit code.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Interpreting child failures: a child's exit code is forwarded unchanged.
//!
//! Invariants:
//! - Exit codes 1-5 are reserved for launcher failures that happen before a launch.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use std::path::PathBuf;

use ftrack_services_config::{ConfigError, VersionError};
use thiserror::Error;

use crate::cancellation::SIGINT_EXIT_CODE;

/// Structured exit codes for ftrack-services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success - task completed successfully.
    Success,

    /// General error - unhandled or generic failure.
    GeneralError,

    /// Unknown task name.
    UnknownTask,

    /// Configuration error - malformed `.env` or a required variable is missing.
    ConfigError,

    /// The addon version could not be resolved.
    VersionError,

    /// The virtual environment is missing or could not be prepared, or the
    /// task process could not be started.
    RuntimeEnvError,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted,

    /// Exit code forwarded from the task subprocess.
    Child(i32),
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::GeneralError => 1,
            ExitCode::UnknownTask => 2,
            ExitCode::ConfigError => 3,
            ExitCode::VersionError => 4,
            ExitCode::RuntimeEnvError => 5,
            ExitCode::Interrupted => SIGINT_EXIT_CODE as i32,
            ExitCode::Child(code) => code,
        }
    }
}

/// Errors raised by the dispatcher itself.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Unknown task '{name}'. Available tasks: {available}")]
    UnknownTask { name: String, available: String },

    #[error("Task '{task}' requires {var}. Set it in the environment or in .env")]
    MissingEnv {
        task: &'static str,
        var: &'static str,
    },

    #[error(
        "Virtual environment not found at {path}. Run `ftrack-services install` to create it"
    )]
    VenvMissing { path: PathBuf },

    #[error("Failed to create virtual environment at {path} (exit code {code})")]
    VenvCreation { path: PathBuf, code: i32 },

    #[error("Requirements manifest not found at {path}")]
    RequirementsMissing { path: PathBuf },

    #[error("Failed to launch {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<&TaskError> for ExitCode {
    fn from(err: &TaskError) -> Self {
        match err {
            TaskError::UnknownTask { .. } => ExitCode::UnknownTask,
            TaskError::MissingEnv { .. } => ExitCode::ConfigError,
            TaskError::VenvMissing { .. }
            | TaskError::VenvCreation { .. }
            | TaskError::RequirementsMissing { .. }
            | TaskError::Spawn { .. }
            | TaskError::Wait { .. } => ExitCode::RuntimeEnvError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<TaskError>() {
                return ExitCode::from(err);
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return ExitCode::ConfigError;
            }
            if cause.downcast_ref::<VersionError>().is_some() {
                return ExitCode::VersionError;
            }
        }

        ExitCode::GeneralError
    }
}
