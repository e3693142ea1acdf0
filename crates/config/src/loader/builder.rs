//! Builder-pattern configuration loader.
//!
//! Responsibilities:
//! - Capture the ambient process environment once.
//! - Layer `.env` entries from the services directory over it.
//! - Produce an immutable `Config` for the dispatcher.
//!
//! Does NOT handle:
//! - Mutating the process environment. Nothing here calls `set_var`.
//!
//! Invariants:
//! - `.env` entries override ambient values with the same key.
//! - Within `.env`, later definitions override earlier ones.
//! - The `DOTENV_DISABLED` gate is read from the ambient environment only.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::env::{apply_env, dotenv_disabled};
use super::error::ConfigError;
use crate::constants::{DOTENV_DISABLED_VAR, DOTENV_FILE};
use crate::types::{Config, ConfigSet};

/// Configuration loader that builds config from the environment and `.env`.
pub struct ConfigLoader {
    services_dir: Option<PathBuf>,
    ambient: BTreeMap<String, String>,
    dotenv: BTreeMap<String, String>,
    dotenv_path: Option<PathBuf>,
    non_unicode: Vec<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader seeded with the current process environment.
    ///
    /// Variables whose name or value is not valid unicode cannot be carried
    /// in the Configuration Set. Their (lossy) names end up in
    /// `Config::non_unicode_env`.
    pub fn new() -> Self {
        let (ambient, non_unicode) = split_unicode(std::env::vars_os());
        Self {
            services_dir: None,
            ambient,
            dotenv: BTreeMap::new(),
            dotenv_path: None,
            non_unicode,
        }
    }

    /// Use `dir` as the services directory instead of the current directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.services_dir = Some(dir.into());
        self
    }

    /// Replace the captured ambient environment (primarily for testing).
    pub fn with_ambient<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.ambient = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.non_unicode.clear();
        self
    }

    /// Path of the `.env` file that was loaded, if any.
    pub fn dotenv_path(&self) -> Option<&Path> {
        self.dotenv_path.as_deref()
    }

    fn resolve_services_dir(&mut self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.services_dir {
            return Ok(dir.clone());
        }
        let dir = std::env::current_dir().map_err(ConfigError::ServicesDirUnavailable)?;
        self.services_dir = Some(dir.clone());
        Ok(dir)
    }

    /// Check if dotenv loading is disabled via the ambient environment.
    fn dotenv_disabled(&self) -> bool {
        dotenv_disabled(self.ambient.get(DOTENV_DISABLED_VAR).map(String::as_str))
    }

    /// Read `.env` from the services directory if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the file is not read.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(mut self) -> Result<Self, ConfigError> {
        if self.dotenv_disabled() {
            tracing::debug!("dotenv loading disabled");
            return Ok(self);
        }

        let path = self.resolve_services_dir()?.join(DOTENV_FILE);
        let iter = match dotenvy::from_path_iter(&path) {
            Ok(iter) => iter,
            Err(e) if Self::is_not_found(&e) => return Ok(self),
            Err(e) => return Err(Self::map_dotenv_error(e)),
        };

        for item in iter {
            let (key, value) = item.map_err(Self::map_dotenv_error)?;
            self.dotenv.insert(key, value);
        }

        tracing::debug!(path = %path.display(), entries = self.dotenv.len(), "loaded .env");
        self.dotenv_path = Some(path);
        Ok(self)
    }

    fn map_dotenv_error(err: dotenvy::Error) -> ConfigError {
        match err {
            dotenvy::Error::LineParse(_, idx) => ConfigError::DotenvParse { error_index: idx },
            dotenvy::Error::Io(io_err) => ConfigError::DotenvIo {
                kind: io_err.kind(),
            },
            _ => ConfigError::DotenvUnknown,
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Merge the sources into the final configuration.
    pub fn build(mut self) -> Result<Config, ConfigError> {
        let services_dir = self.resolve_services_dir()?;

        let mut vars = self.ambient;
        vars.extend(self.dotenv);

        let mut config = apply_env(services_dir, ConfigSet::from_map(vars));
        config.non_unicode_env = self.non_unicode;
        Ok(config)
    }
}

/// Split `vars` into unicode entries and the names of the entries that are not.
pub(crate) fn split_unicode(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> (BTreeMap<String, String>, Vec<String>) {
    let mut unicode = BTreeMap::new();
    let mut skipped = Vec::new();
    for (key, value) in vars {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => {
                unicode.insert(key, value);
            }
            (Ok(key), Err(_)) => skipped.push(key),
            (Err(key), _) => skipped.push(key.to_string_lossy().into_owned()),
        }
    }
    for key in &skipped {
        tracing::debug!(key = %key, "skipping non-unicode environment variable");
    }
    (unicode, skipped)
}
