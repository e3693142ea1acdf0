//! Configuration loader for the ambient environment and `.env` files.
//!
//! Responsibilities:
//! - Load configuration from `.env` files and environment variables.
//! - Provide a builder-pattern `ConfigLoader` that merges them into a `Config`.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Resolving the addon version (see `version.rs`).
//!
//! Invariants / Assumptions:
//! - `.env` values take precedence over ambient environment values.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before the `.env` file is opened.

mod builder;
mod env;
mod error;

pub use builder::ConfigLoader;
pub use env::dotenv_disabled;
pub use error::ConfigError;

#[cfg(test)]
mod tests;
