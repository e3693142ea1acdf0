//! Centralized constants for the ftrack services workspace.
//!
//! This module contains the names, paths and defaults shared by the
//! configuration loader, the version resolver and the task dispatcher.

// =============================================================================
// Addon Identity
// =============================================================================

/// Name of the addon the services belong to.
pub const ADDON_NAME: &str = "ftrack";

/// Name of the client-side Python package shipped inside the addon.
pub const ADDON_CLIENT_DIR: &str = "ayon_ftrack";

/// Directory with code shared between the client and the server parts.
pub const COMMON_DIR_NAME: &str = "ftrack_common";

/// Environment variable exported to service processes with the addon name.
pub const ADDON_NAME_VAR: &str = "AYON_ADDON_NAME";

/// Environment variable exported to service processes with the addon version.
pub const ADDON_VERSION_VAR: &str = "AYON_ADDON_VERSION";

/// Server URL the service processes connect to.
pub const SERVER_URL_VAR: &str = "AY_SERVER_URL";

/// API key the service processes authenticate with.
pub const API_KEY_VAR: &str = "AY_API_KEY";

// =============================================================================
// Files & Paths
// =============================================================================

/// Optional dotenv file read from the services directory.
pub const DOTENV_FILE: &str = ".env";

/// Version-bearing module, relative to the services directory.
pub const DEFAULT_VERSION_FILE: &str = "../version.py";

/// Attribute bound to the version string in the version file.
pub const VERSION_ATTRIBUTE: &str = "__version__";

/// Virtual environment directory, relative to the services directory.
pub const DEFAULT_VENV_DIR: &str = "venv";

/// Requirements manifest, relative to the services directory.
pub const DEFAULT_REQUIREMENTS_FILE: &str = "requirements.txt";

/// Entry point of the event leecher, relative to the services directory.
pub const LEECHER_ENTRY_POINT: &str = "leecher/leecher_main.py";

/// Entry point of the event processor, relative to the services directory.
pub const PROCESSOR_ENTRY_POINT: &str = "processor/processor_main.py";

/// Base interpreter used to create the virtual environment.
#[cfg(windows)]
pub const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_PYTHON: &str = "python3";

// =============================================================================
// Configuration Keys
// =============================================================================

/// Set to `1` or `true` to skip `.env` loading.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

/// Overrides [`DEFAULT_PYTHON`].
pub const PYTHON_VAR: &str = "FTRACK_SERVICES_PYTHON";

/// Overrides [`DEFAULT_VENV_DIR`].
pub const VENV_VAR: &str = "FTRACK_SERVICES_VENV";

/// Overrides [`DEFAULT_REQUIREMENTS_FILE`].
pub const REQUIREMENTS_VAR: &str = "FTRACK_SERVICES_REQUIREMENTS";

/// Overrides [`DEFAULT_VERSION_FILE`].
pub const VERSION_FILE_VAR: &str = "FTRACK_SERVICES_VERSION_FILE";

/// Log filter directive.
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";
