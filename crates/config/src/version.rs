//! Addon version resolution.
//!
//! Responsibilities:
//! - Read the sibling `version.py` and extract the string bound to `__version__`.
//!
//! Does NOT handle:
//! - Executing the file. The value is found by a static parse of top-level
//!   assignments; nothing in the file is run or imported.
//!
//! Invariants:
//! - Only unindented assignments count; the last one in the file wins.
//! - A resolved version is non-empty and contains no whitespace.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::constants::VERSION_ATTRIBUTE;

/// Matches `__version__ = "..."`, `__version__: str = '...'`, with an
/// optional trailing `;` and comment.
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r#"^{}[ \t]*(?::[ \t]*[A-Za-z_][\w.]*[ \t]*)?=[ \t]*(?:"([^"\\\r\n]*)"|'([^'\\\r\n]*)')[ \t]*(?:;[ \t]*)?(?:#.*)?\r?$"#,
        regex::escape(VERSION_ATTRIBUTE)
    );
    RegexBuilder::new(&pattern)
        .multi_line(true)
        .build()
        .expect("version assignment pattern is valid")
});

/// Errors that can occur while resolving the addon version.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Failed to read version file at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Version file at {path} does not assign {attribute}")]
    MissingAttribute { path: PathBuf, attribute: &'static str },

    #[error("Version file at {path} assigns an invalid version {value:?}")]
    Invalid { path: PathBuf, value: String },
}

/// Addon version identifier, e.g. `1.4.2` or `1.5.0-dev.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonVersion(String);

impl AddonVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AddonVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the version from the text of a version file.
///
/// Returns `None` when no top-level assignment exists.
fn parse_version(content: &str) -> Option<&str> {
    ASSIGNMENT
        .captures_iter(content)
        .last()
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
}

/// Resolve the addon version from `path`.
pub fn resolve_version(path: &Path) -> Result<AddonVersion, VersionError> {
    let content = std::fs::read_to_string(path).map_err(|source| VersionError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value = parse_version(&content).ok_or_else(|| VersionError::MissingAttribute {
        path: path.to_path_buf(),
        attribute: VERSION_ATTRIBUTE,
    })?;

    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(VersionError::Invalid {
            path: path.to_path_buf(),
            value: value.to_string(),
        });
    }

    tracing::debug!(path = %path.display(), version = value, "resolved addon version");
    Ok(AddonVersion(value.to_string()))
}
