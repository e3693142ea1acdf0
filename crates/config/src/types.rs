//! Configuration types shared by the loader and the dispatcher.
//!
//! Responsibilities:
//! - Hold the merged key/value Configuration Set (`ConfigSet`).
//! - Hold the resolved paths and interpreter the tasks operate on (`Config`).
//!
//! Does NOT handle:
//! - Reading `.env` files or the ambient environment (see `loader`).
//!
//! Invariants:
//! - A `ConfigSet` is never mutated once `ConfigLoader::build()` returns it.
//! - All paths in `Config` are absolute when the services directory is absolute.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Immutable mapping of configuration keys to values.
///
/// Built from the ambient process environment with `.env` entries layered
/// on top. Tasks receive it explicitly and use it as the complete
/// environment of the processes they launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSet {
    vars: BTreeMap<String, String>,
}

impl ConfigSet {
    pub(crate) fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Build a set directly from key/value pairs; later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Raw value for `key`, if defined.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value for `key`, returning None if unset, empty, or whitespace-only.
    /// Returns the trimmed value if present.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy of the entries, for composing a child process environment.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.vars.clone()
    }
}

/// Resolved launcher configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the service entry points, the venv and `.env`.
    pub services_dir: PathBuf,
    /// Virtual environment directory.
    pub venv_dir: PathBuf,
    /// Base interpreter used to create the virtual environment.
    pub python: String,
    /// Requirements manifest consumed by `install`.
    pub requirements_file: PathBuf,
    /// Sibling file carrying the addon version.
    pub version_file: PathBuf,
    /// Merged environment.
    pub env: ConfigSet,
    /// Ambient variables left out of `env` because they are not valid unicode.
    pub non_unicode_env: Vec<String>,
}

impl Config {
    /// Resolve `path` against the services directory.
    pub fn services_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.services_dir.join(path)
    }

    /// Root of the addon repository: the directory holding the version file.
    pub fn addon_root(&self) -> PathBuf {
        self.version_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.services_dir.clone())
    }
}
