//! Configuration management for the ftrack services launcher.
//!
//! This crate provides the Configuration Set loaded from the ambient
//! environment and an optional `.env` file, the resolved launcher paths,
//! and the addon version resolver.

pub mod constants;
mod loader;
pub mod types;
pub mod version;

pub use loader::{ConfigError, ConfigLoader, dotenv_disabled};
pub use types::{Config, ConfigSet};
pub use version::{AddonVersion, VersionError, resolve_version};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
