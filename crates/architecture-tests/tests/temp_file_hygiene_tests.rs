//! Purpose: Enforce deterministic temp file cleanup patterns in tests.
//!
//! Ensures temp files and directories in tests come from the tempfile crate's
//! RAII types rather than std::env::temp_dir() with manual cleanup.
//!
//! Non-scope: This test does not verify runtime behavior; it only checks
//! source code patterns.
//!
//! Invariants:
//! - Test code must use the tempfile crate for temp file management
//! - No hardcoded /tmp paths allowed in tests
//! - Manual cleanup via std::fs::remove_file is discouraged in tests

use std::fs;
use std::path::{Path, PathBuf};

/// Files exempt from the tempfile requirement.
const EXEMPT_FILES: &[&str] = &[];

/// Test sources below `crates/`, as (path, content) pairs.
///
/// This crate is skipped: its checks spell out the patterns they reject.
fn test_sources() -> Vec<(PathBuf, String)> {
    let crates_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("architecture-tests lives below crates/")
        .to_path_buf();

    walkdir::WalkDir::new(crates_dir)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name();
            name != "target" && name != "architecture-tests"
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .filter(|e| {
            let path_str = e.path().to_string_lossy();
            !EXEMPT_FILES.iter().any(|exempt| path_str.contains(exempt))
        })
        .filter_map(|e| {
            let content = fs::read_to_string(e.path()).ok()?;
            let has_tests = content.contains("#[test]") || content.contains("#[tokio::test]");
            has_tests.then(|| (e.into_path(), content))
        })
        .collect()
}

#[test]
fn test_no_manual_temp_dir_usage() {
    let mut violations: Vec<String> = Vec::new();

    for (path, content) in test_sources() {
        let path_str = path.to_string_lossy();
        let is_test_file = path_str.contains("/tests/") || path_str.contains("_tests.rs");

        if content.contains("std::env::temp_dir()") {
            violations.push(format!(
                "{}: uses std::env::temp_dir() - prefer tempfile::tempdir() for RAII cleanup",
                path.display()
            ));
        }

        if content.contains("\"/tmp") || content.contains("'/tmp") {
            violations.push(format!(
                "{}: contains hardcoded /tmp path - prefer tempfile crate",
                path.display()
            ));
        }

        if is_test_file && content.contains("std::fs::remove_file") && !content.contains("tempfile")
        {
            violations.push(format!(
                "{}: uses std::fs::remove_file without tempfile - prefer TempDir for automatic cleanup",
                path.display()
            ));
        }
    }

    assert!(
        violations.is_empty(),
        "Found manual temp file patterns (not panic-safe):\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_tempfile_bindings_retained() {
    let mut violations: Vec<String> = Vec::new();

    for (path, content) in test_sources() {
        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.starts_with("let _ = tempfile::")
                || trimmed.starts_with("let _ = tempdir()")
                || trimmed.starts_with("let _ = TempDir")
                || trimmed.starts_with("let _ = NamedTempFile")
            {
                violations.push(format!(
                    "{}:{}: tempfile instance bound to `_` - use a named variable for RAII cleanup",
                    path.display(),
                    i + 1
                ));
            }

            // A statement that starts with the call drops the guard at once.
            if trimmed.starts_with("tempfile::tempdir()") || trimmed.starts_with("TempDir::new()") {
                violations.push(format!(
                    "{}:{}: tempfile call result not retained - bind to a variable for RAII cleanup",
                    path.display(),
                    i + 1
                ));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Found tempfile instances not properly retained:\n{}",
        violations.join("\n")
    );
}
