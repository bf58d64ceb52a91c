// ABOUTME: Integration tests for the marathon-deploy CLI.
// ABOUTME: Validates --help output, argument errors, and early failures before any request.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn marathon_deploy_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("marathon-deploy"));
    cmd.env_remove("MARATHON_DEPLOY_CREDENTIAL");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_shows_flags() {
    marathon_deploy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--app-definition"))
        .stdout(predicate::str::contains("--marathon-url"))
        .stdout(predicate::str::contains("--credential"))
        .stdout(predicate::str::contains("--instances"))
        .stdout(predicate::str::contains("--zero-down"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn missing_required_arguments_fail() {
    marathon_deploy_cmd()
        .args(["-a", "app.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn zero_instances_rejected() {
    marathon_deploy_cmd()
        .args(["-a", "app.json", "-m", "http://127.0.0.1:1", "-c", "t", "-i", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--instances"));
}

#[test]
fn zero_down_takes_yes_or_no() {
    marathon_deploy_cmd()
        .args(["-a", "app.json", "-m", "http://127.0.0.1:1", "-c", "t", "-z", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--zero-down"));
}

#[test]
fn missing_definition_fails_before_contacting_marathon() {
    let temp_dir = tempfile::tempdir().unwrap();

    marathon_deploy_cmd()
        .current_dir(temp_dir.path())
        .args(["-a", "missing.json", "-m", "http://127.0.0.1:1", "-c", "t", "-z", "no"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: failed to read app definition"));
}

#[test]
fn definition_without_id_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("app.json"), r#"{"instances": 2}"#).unwrap();

    marathon_deploy_cmd()
        .current_dir(temp_dir.path())
        .args(["-a", "app.json", "-m", "http://127.0.0.1:1", "-c", "t"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no string \"id\" field"));
}

#[test]
fn non_http_url_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("app.json"), r#"{"id": "/svc.v1"}"#).unwrap();

    marathon_deploy_cmd()
        .current_dir(temp_dir.path())
        .args(["-a", "app.json", "-m", "ftp://dcos.example.com", "-c", "t"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected http or https"));
}

#[test]
fn explicit_config_must_exist() {
    let temp_dir = tempfile::tempdir().unwrap();

    marathon_deploy_cmd()
        .current_dir(temp_dir.path())
        .args(["-a", "app.json", "-m", "http://127.0.0.1:1", "-c", "t"])
        .args(["--config", "nope.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn invalid_config_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("marathon-deploy.yml"), "default_instances: 0\n").unwrap();

    marathon_deploy_cmd()
        .current_dir(temp_dir.path())
        .args(["-a", "app.json", "-m", "http://127.0.0.1:1", "-c", "t"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn json_mode_reports_errors_as_events() {
    let temp_dir = tempfile::tempdir().unwrap();

    marathon_deploy_cmd()
        .current_dir(temp_dir.path())
        .args(["-a", "missing.json", "-m", "http://127.0.0.1:1", "-c", "t", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""event":"error""#));
}
