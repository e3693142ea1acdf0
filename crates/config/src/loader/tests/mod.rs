//! Tests for the configuration loader builder.
//!
//! Responsibilities:
//! - Test `.env` loading, precedence and the `DOTENV_DISABLED` gate.
//! - Test capture of the ambient process environment.
//!
//! Does NOT handle:
//! - Key-to-path resolution logic (tested in env.rs).
//!
//! Invariants:
//! - Tests that touch the process environment or cwd use `serial_test`
//!   and `global_test_lock()`.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}
