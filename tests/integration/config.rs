use assert_cmd::Command;
use livetpl::config::{CONFIG_ENV_VAR, GlobalConfig};
use livetpl::templating::Engine;
use livetpl::test_utils::TestWorkspace;
use predicates::prelude::*;
use serial_test::serial;

use super::livetpl;

#[test]
fn test_config_default_engine_applies_without_flag_or_state() {
    let ws = TestWorkspace::with_config(|c| c.default_engine = Some(Engine::Html)).unwrap();
    ws.write("template.html", "<i>{{name}}</i>").unwrap();

    livetpl(&ws)
        .arg("render")
        .arg(ws.path())
        .assert()
        .success()
        .stdout("<i>{{name}}</i>\n");
}

#[test]
fn test_config_from_environment_variable() {
    let ws = TestWorkspace::with_config(|c| c.default_engine = Some(Engine::Html)).unwrap();
    ws.write("template.html", "<i>{{name}}</i>").unwrap();

    Command::cargo_bin("livetpl")
        .unwrap()
        .env(CONFIG_ENV_VAR, ws.config_path())
        .env("NO_COLOR", "1")
        .arg("render")
        .arg(ws.path())
        .assert()
        .success()
        .stdout("<i>{{name}}</i>\n");
}

#[test]
fn test_invalid_config_is_reported() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("template.html", "x").unwrap();
    std::fs::write(ws.config_path(), "persist_quiet_ms = 2000\npersist_max_wait_ms = 10\n").unwrap();

    livetpl(&ws)
        .arg("render")
        .arg(ws.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains("persist_max_wait_ms"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let ws = TestWorkspace::new().unwrap();
    std::fs::remove_file(ws.config_path()).unwrap();

    livetpl(&ws).arg("engines").assert().failure();
}

#[tokio::test]
#[serial]
async fn test_load_with_optional_reads_environment() {
    let ws = TestWorkspace::with_config(|c| c.settle_window_ms = 125).unwrap();

    // SAFETY: serialized with every other test that touches the environment.
    unsafe { std::env::set_var(CONFIG_ENV_VAR, ws.config_path()) };
    let loaded = GlobalConfig::load_with_optional(None).await;
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    assert_eq!(loaded.unwrap().settle_window_ms, 125);
}

#[tokio::test]
#[serial]
async fn test_missing_environment_config_falls_back_to_defaults() {
    let ws = TestWorkspace::new().unwrap();
    let missing = ws.path().join("absent.toml");

    // SAFETY: serialized with every other test that touches the environment.
    unsafe { std::env::set_var(CONFIG_ENV_VAR, &missing) };
    let loaded = GlobalConfig::load_with_optional(None).await;
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    assert_eq!(loaded.unwrap(), GlobalConfig::default());
}
