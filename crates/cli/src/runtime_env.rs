//! Python virtual environment handling.
//!
//! Responsibilities:
//! - Locate the services' virtual environment and its interpreter.
//! - Create it with the base interpreter when `install` needs it.
//! - Activate it as a scope (`ActivatedEnv`) bound to the commands it builds.
//!
//! Does NOT handle:
//! - Waiting for processes (see `launch`).
//!
//! Invariants:
//! - Activation never touches the launcher's own environment; it only shapes
//!   the environment of commands built from the `ActivatedEnv`.
//! - Commands built from an `ActivatedEnv` see exactly its environment
//!   (`env_clear()` first).
//! - Release is logged on every exit path through `Drop`.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ftrack_services_config::{Config, ConfigSet};
use tokio::process::Command;

use crate::cancellation::CancellationToken;
use crate::error::{ExitCode, TaskError};
use crate::launch;

#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

#[cfg(windows)]
const INTERPRETER: &str = "python.exe";
#[cfg(not(windows))]
const INTERPRETER: &str = "python";

/// A virtual environment directory, present or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    root: PathBuf,
}

impl VirtualEnv {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// The environment's Python interpreter.
    pub fn interpreter(&self) -> PathBuf {
        self.bin_dir().join(INTERPRETER)
    }

    pub fn exists(&self) -> bool {
        self.interpreter().is_file()
    }

    /// Create the environment with `<python> -m venv <root>` if it is missing.
    pub async fn ensure(&self, config: &Config, cancel: &CancellationToken) -> Result<(), TaskError> {
        if self.exists() {
            return Ok(());
        }

        tracing::info!(path = %self.root.display(), python = %config.python, "creating virtual environment");
        let mut command = Command::new(&config.python);
        command
            .arg("-m")
            .arg("venv")
            .arg(&self.root)
            .current_dir(&config.services_dir)
            .env_clear()
            .envs(config.env.iter());

        match launch::run(command, cancel).await? {
            ExitCode::Success => Ok(()),
            code => Err(TaskError::VenvCreation {
                path: self.root.clone(),
                code: code.as_i32(),
            }),
        }
    }

    /// Activate the environment on top of `env`.
    ///
    /// Fails with `TaskError::VenvMissing` when the interpreter is absent.
    pub fn activate(&self, env: &ConfigSet) -> Result<ActivatedEnv, TaskError> {
        if !self.exists() {
            return Err(TaskError::VenvMissing {
                path: self.root.clone(),
            });
        }

        let mut vars = env.to_map();
        vars.remove("PYTHONHOME");
        vars.insert(
            "VIRTUAL_ENV".to_string(),
            self.root.to_string_lossy().into_owned(),
        );

        let key = path_key(&vars);
        let mut entries: Vec<PathBuf> = vec![self.bin_dir()];
        if let Some(existing) = vars.get(&key) {
            entries.extend(std::env::split_paths(existing));
        }
        let joined: OsString = std::env::join_paths(entries)
            .unwrap_or_else(|_| self.bin_dir().into_os_string());
        vars.insert(key, joined.to_string_lossy().into_owned());

        tracing::debug!(path = %self.root.display(), "virtual environment activated");
        Ok(ActivatedEnv {
            venv: self.clone(),
            vars,
        })
    }
}

/// Name of the PATH variable as spelled in `vars`.
fn path_key(vars: &BTreeMap<String, String>) -> String {
    if cfg!(windows) {
        vars.keys()
            .find(|k| k.eq_ignore_ascii_case("PATH"))
            .cloned()
            .unwrap_or_else(|| "PATH".to_string())
    } else {
        "PATH".to_string()
    }
}

/// An activated virtual environment scope.
///
/// Holds the composed child environment. Deactivation happens on drop.
#[derive(Debug)]
pub struct ActivatedEnv {
    venv: VirtualEnv,
    vars: BTreeMap<String, String>,
}

impl ActivatedEnv {
    /// Add or replace a variable for commands built from this scope.
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    #[cfg(test)]
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn interpreter(&self) -> PathBuf {
        self.venv.interpreter()
    }

    /// Command running the environment's interpreter with this scope's environment.
    pub fn python_command(&self, cwd: &Path) -> Command {
        let mut command = Command::new(self.interpreter());
        command.current_dir(cwd).env_clear().envs(&self.vars);
        command
    }
}

impl Drop for ActivatedEnv {
    fn drop(&mut self) {
        tracing::debug!(path = %self.venv.root.display(), "virtual environment released");
    }
}
