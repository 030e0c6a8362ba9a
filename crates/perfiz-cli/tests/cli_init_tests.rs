//! Integration tests for `perfiz init`

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const TEMPLATES: [&str; 4] = [
    "perfiz.yml",
    "gatling.conf",
    "dashboard.json",
    "prometheus.yml",
];

/// A perfiz home with templates and an empty project next to it.
fn setup() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().expect("failed to create temp dir");
    let home = dir.path().join("home");
    let project = dir.path().join("project");
    fs::create_dir_all(home.join("templates")).expect("create templates");
    fs::create_dir_all(&project).expect("create project");
    for name in TEMPLATES {
        fs::write(home.join("templates").join(name), format!("# {name}\n")).expect("write template");
    }
    (dir, home, project)
}

fn init(home: &Path, project: &Path) -> assert_cmd::assert::Assert {
    Command::cargo_bin("perfiz")
        .expect("failed to find perfiz binary")
        .arg("init")
        .current_dir(project)
        .env("PERFIZ_HOME", home)
        .env_remove("PERFIZ_LOG")
        .assert()
}

#[test]
fn init_stages_templates() {
    let (_dir, home, project) = setup();

    init(&home, &project)
        .success()
        .stderr(predicate::str::contains("Init Completed"))
        .stderr(predicate::str::contains("perfiz/*_data"));

    assert_eq!(
        fs::read_to_string(project.join("perfiz.yml")).unwrap(),
        "# perfiz.yml\n"
    );
    assert!(project.join("perfiz/gatling/gatling.conf").is_file());
    assert!(project.join("perfiz/dashboards/dashboard.json").is_file());
    assert!(project.join("perfiz/prometheus/prometheus.yml").is_file());
}

#[test]
fn init_twice_does_not_overwrite() {
    let (_dir, home, project) = setup();
    init(&home, &project).success();
    fs::write(project.join("perfiz.yml"), "karateFeaturesDir: api\n").unwrap();

    init(&home, &project)
        .success()
        .stderr(predicate::str::contains("perfiz.yml is already present. Skipping."));

    assert_eq!(
        fs::read_to_string(project.join("perfiz.yml")).unwrap(),
        "karateFeaturesDir: api\n"
    );
}

#[cfg(unix)]
#[test]
fn init_opens_perfiz_folder_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, home, project) = setup();
    init(&home, &project).success();

    let mode = fs::metadata(project.join("perfiz")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o777);
}

#[test]
fn init_without_perfiz_home_fails() {
    let (_dir, _home, project) = setup();

    Command::cargo_bin("perfiz")
        .expect("failed to find perfiz binary")
        .arg("init")
        .current_dir(&project)
        .env_remove("PERFIZ_HOME")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Please set PERFIZ_HOME environment variable",
        ));

    assert!(!project.join("perfiz.yml").exists());
}
