//! Shared test utilities for ftrack-services integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Build a throwaway addon layout with a fake virtual environment.
//!
//! Invariants / Assumptions:
//! - All integration tests using these helpers are hermetic by default.
//! - The fake interpreter is a POSIX shell script; tests that launch it are Unix-only.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const VERSION: &str = "1.4.2";

/// Fake venv interpreter: records one line per launch, then exits with
/// `FAKE_EXIT_CODE` (default 0), optionally after sleeping `FAKE_SLEEP` seconds.
const FAKE_PYTHON: &str = r#"#!/bin/sh
printf '%s|%s|%s|%s\n' "$AYON_ADDON_NAME" "$AYON_ADDON_VERSION" "$VIRTUAL_ENV" "$*" >> "$LAUNCH_LOG"
if [ -n "$FAKE_SLEEP" ]; then
    sleep "$FAKE_SLEEP"
fi
exit "${FAKE_EXIT_CODE:-0}"
"#;

/// Returns a hermetic `ftrack-services` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Launcher settings and service credentials are cleared from the host.
pub fn services_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ftrack-services");

    cmd.env("DOTENV_DISABLED", "1");

    for (key, _) in std::env::vars() {
        if key.starts_with("AY_")
            || key.starts_with("AYON_")
            || key.starts_with("FTRACK_SERVICES_")
            || key == "VIRTUAL_ENV"
            || key == "RUST_LOG"
        {
            cmd.env_remove(&key);
        }
    }

    cmd
}

/// Temporary addon repository:
///
/// ```text
/// <root>/version.py
/// <root>/services/requirements.txt
/// <root>/services/leecher/leecher_main.py
/// <root>/services/processor/processor_main.py
/// ```
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.write("version.py", &format!("__version__ = \"{}\"\n", VERSION));
        fixture.write("services/requirements.txt", "ftrack-python-api\n");
        fixture.write("services/leecher/leecher_main.py", "");
        fixture.write("services/processor/processor_main.py", "");
        fixture
    }

    /// Install the fake interpreter at `services/venv/bin/python`.
    #[cfg(unix)]
    pub fn with_fake_venv(self) -> Self {
        let interpreter = self.venv_dir().join("bin").join("python");
        self.write_script(&interpreter, FAKE_PYTHON);
        self
    }

    /// Write a base interpreter whose `-m venv <dir>` creates the fake venv.
    #[cfg(unix)]
    pub fn fake_base_python(&self) -> PathBuf {
        let template = self.root().join("fake_python.sh");
        self.write_script(&template, FAKE_PYTHON);

        let base = self.root().join("base_python.sh");
        let script = format!(
            "#!/bin/sh\nprintf 'base|%s\\n' \"$*\" >> \"$LAUNCH_LOG\"\nmkdir -p \"$3/bin\"\ncp '{}' \"$3/bin/python\"\n",
            template.display()
        );
        self.write_script(&base, &script);
        base
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn services_dir(&self) -> PathBuf {
        self.root().join("services")
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.services_dir().join("venv")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root().join("launch.log")
    }

    /// Write `contents` to `relative` below the root, creating parents.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.root().join(relative)).unwrap();
    }

    /// Lines recorded by the fake interpreter, empty when it never ran.
    pub fn launches(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Hermetic command running in the services directory.
    pub fn cmd(&self) -> Command {
        let mut cmd = services_cmd();
        cmd.current_dir(self.services_dir())
            .env("LAUNCH_LOG", self.log_path());
        cmd
    }

    /// `cmd()` with the service credentials set.
    pub fn service_cmd(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("AY_SERVER_URL", "http://ayon.test")
            .env("AY_API_KEY", "test-key");
        cmd
    }

    #[cfg(unix)]
    fn write_script(&self, path: &Path, contents: &str) {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
