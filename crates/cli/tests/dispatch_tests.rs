//! Integration tests for task dispatch and structured exit codes.
//!
//! Responsibilities:
//! - Prove the banner tasks print usage and launch nothing.
//! - Prove unknown task names exit 2 without launching anything.
//! - Prove each pre-launch failure maps to its exit code.
//! - Prove service tasks launch exactly one process and forward its code.

mod common;

use common::{Fixture, VERSION, services_cmd};
use predicates::prelude::*;

#[test]
fn test_no_task_prints_banner() {
    services_cmd()
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Usage: ftrack-services <TASK>"))
        .stdout(predicate::str::contains("leecher"))
        .stdout(predicate::str::contains("processor"));
}

#[test]
fn test_help_and_default_print_same_banner() {
    let help = services_cmd().arg("help").output().unwrap();
    let default = services_cmd().arg("default").output().unwrap();

    assert_eq!(help.status.code(), Some(0));
    assert_eq!(default.status.code(), Some(0));
    assert_eq!(help.stdout, default.stdout);
}

#[test]
fn test_unknown_task_exits_2_and_launches_nothing() {
    let fixture = Fixture::new();

    fixture
        .service_cmd()
        .arg("bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown task 'bogus'"))
        .stderr(predicate::str::contains("leecher"));

    assert!(fixture.launches().is_empty());
}

#[test]
fn test_missing_server_url_exits_3() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .env("AY_API_KEY", "test-key")
        .arg("leecher")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("AY_SERVER_URL"));

    assert!(fixture.launches().is_empty());
}

#[test]
fn test_blank_api_key_exits_3() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .env("AY_SERVER_URL", "http://ayon.test")
        .env("AY_API_KEY", "   ")
        .arg("processor")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("AY_API_KEY"));
}

#[test]
fn test_missing_version_attribute_exits_4() {
    let fixture = Fixture::new();
    fixture.write("version.py", "VERSION = \"1.0.0\"\n");

    fixture
        .service_cmd()
        .arg("leecher")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("__version__"));

    assert!(fixture.launches().is_empty());
}

#[test]
fn test_missing_version_file_exits_4() {
    let fixture = Fixture::new();
    fixture.remove("version.py");

    fixture.service_cmd().arg("processor").assert().code(4);
}

#[test]
fn test_missing_venv_exits_5_and_points_at_install() {
    let fixture = Fixture::new();

    fixture
        .service_cmd()
        .arg("leecher")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("ftrack-services install"));
}

#[cfg(unix)]
mod launches {
    use super::*;

    #[test]
    fn test_leecher_launches_once_with_addon_vars() {
        let fixture = Fixture::new().with_fake_venv();

        fixture.service_cmd().arg("leecher").assert().code(0);

        let launches = fixture.launches();
        assert_eq!(launches.len(), 1, "launches: {:?}", launches);
        let fields: Vec<&str> = launches[0].split('|').collect();
        assert_eq!(fields[0], "ftrack");
        assert_eq!(fields[1], VERSION);
        assert!(fields[2].ends_with("services/venv"), "VIRTUAL_ENV: {}", fields[2]);
        assert!(fields[3].ends_with("leecher/leecher_main.py"), "args: {}", fields[3]);
    }

    #[test]
    fn test_processor_runs_processor_entry_point() {
        let fixture = Fixture::new().with_fake_venv();

        fixture.service_cmd().arg("processor").assert().code(0);

        let launches = fixture.launches();
        assert_eq!(launches.len(), 1);
        assert!(launches[0].ends_with("processor/processor_main.py"));
    }

    #[test]
    fn test_child_exit_code_is_forwarded() {
        let fixture = Fixture::new().with_fake_venv();

        fixture
            .service_cmd()
            .env("FAKE_EXIT_CODE", "3")
            .arg("leecher")
            .assert()
            .code(3);

        assert_eq!(fixture.launches().len(), 1);
    }

    #[test]
    fn test_version_file_override() {
        let fixture = Fixture::new().with_fake_venv();
        fixture.write("meta/version.py", "__version__ = '2.0.0-beta'\n");

        fixture
            .service_cmd()
            .env("FTRACK_SERVICES_VERSION_FILE", "../meta/version.py")
            .arg("leecher")
            .assert()
            .code(0);

        assert!(fixture.launches()[0].starts_with("ftrack|2.0.0-beta|"));
    }

    #[test]
    fn test_addon_vars_do_not_leak_from_host_settings() {
        let fixture = Fixture::new().with_fake_venv();

        fixture
            .service_cmd()
            .env("AYON_ADDON_NAME", "other")
            .env("AYON_ADDON_VERSION", "0.0.0")
            .arg("leecher")
            .assert()
            .code(0);

        assert!(fixture.launches()[0].starts_with(&format!("ftrack|{}|", VERSION)));
    }
}
