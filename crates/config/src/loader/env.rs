//! Configuration key parsing.
//!
//! Responsibilities:
//! - Read launcher settings (interpreter, venv, manifest, version file) from
//!   the merged Configuration Set.
//! - Resolve relative paths against the services directory.
//!
//! Does NOT handle:
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Empty or whitespace-only values are treated as unset.
//! - Relative paths are resolved against the services directory, never the cwd.

use std::path::{Component, Path, PathBuf};

use crate::constants::{
    DEFAULT_PYTHON, DEFAULT_REQUIREMENTS_FILE, DEFAULT_VENV_DIR, DEFAULT_VERSION_FILE,
    PYTHON_VAR, REQUIREMENTS_VAR, VENV_VAR, VERSION_FILE_VAR,
};
use crate::types::{Config, ConfigSet};

/// True if a `DOTENV_DISABLED` value is `1` or `true`.
pub fn dotenv_disabled(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("1"))
}

/// Build the final `Config` from the merged environment.
pub fn apply_env(services_dir: PathBuf, env: ConfigSet) -> Config {
    let resolve = |key: &str, default: &str| {
        let raw = env.get_non_empty(key).unwrap_or(default);
        normalize(&services_dir.join(raw))
    };

    let venv_dir = resolve(VENV_VAR, DEFAULT_VENV_DIR);
    let requirements_file = resolve(REQUIREMENTS_VAR, DEFAULT_REQUIREMENTS_FILE);
    let version_file = resolve(VERSION_FILE_VAR, DEFAULT_VERSION_FILE);
    let python = env
        .get_non_empty(PYTHON_VAR)
        .unwrap_or(DEFAULT_PYTHON)
        .to_string();

    Config {
        services_dir,
        venv_dir,
        python,
        requirements_file,
        version_file,
        env,
        non_unicode_env: Vec::new(),
    }
}

/// Lexically remove `.` and `..` components without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
