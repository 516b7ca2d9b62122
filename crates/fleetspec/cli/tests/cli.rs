//! End-to-end tests for the fleetspec binary against a fixture
//! hierarchy on disk.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        &root.join("tasks/variables.yml"),
        "Version: 0.0.1\nMemory: \"512\"\n",
    );
    write(
        &root.join("tasks/app1/variables.yml"),
        "Stage: development\n",
    );
    write(
        &root.join("tasks/app1/web.yml.tpl"),
        concat!(
            "family: web\n",
            "memory: {{ Memory }}\n",
            "containerDefinitions:\n",
            "  - template: app\n",
        ),
    );
    write(
        &root.join("containers/app/container.yml.tpl"),
        "name: app\nimage: app:{{ Version }}\n",
    );
    dir
}

fn fleetspec() -> Command {
    Command::cargo_bin("fleetspec").unwrap()
}

#[test]
fn test_variables_merges_levels() {
    let dir = fixture();
    fleetspec()
        .args(["variables", "-p", "app1"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Version: 0.0.1"))
        .stdout(predicate::str::contains("Stage: development"));
}

#[test]
fn test_variables_command_line_override_wins() {
    let dir = fixture();
    fleetspec()
        .args(["variables", "-p", "app1", "-v", "Stage=production"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Stage: production"));
}

#[test]
fn test_generate_splices_container() {
    let dir = fixture();
    fleetspec()
        .args(["generate", "-p", "app1", "-t", "web"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("image: app:0.0.1"))
        .stdout(predicate::str::contains("family: web"));
}

#[test]
fn test_escaping_path_is_rejected() {
    let dir = fixture();
    fleetspec()
        .args(["variables", "-p", "../secrets"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("escapes the hierarchy root"));
}

#[test]
fn test_malformed_var_is_rejected() {
    let dir = fixture();
    fleetspec()
        .args(["variables", "-p", "app1", "-v", "novalue"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_help_names_the_development_backend() {
    for command in ["deploy", "watch"] {
        fleetspec()
            .args([command, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("development backend"));
    }
}

#[test]
fn test_deploy_requires_a_config() {
    let dir = fixture();
    fleetspec()
        .args(["deploy", "-p", "app1", "-t", "web"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("deploy config"));
}
