//! BDD test runner using cucumber for the perfiz CLI.
//!
//! This module sets up the cucumber test framework to execute Gherkin feature files
//! located in the `features/` directory.
//!
//! Step definitions cover:
//! - Given steps: perfiz home, project and fake docker fixtures
//! - When steps: CLI command execution
//! - Then steps: exit code, output and filesystem assertions

use assert_cmd::Command;
use cucumber::{given, then, when, World};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use perfiz_types::{home, INIT_TEMPLATES, PERFIZ_HOME_ENV_VARIABLE};

/// World struct that holds state across BDD scenario steps.
#[derive(Debug, Default, World)]
pub struct PerfizWorld {
    /// Temporary directory holding home, project and fake tools
    temp_dir: Option<TempDir>,
    /// When false, PERFIZ_HOME is removed from the command environment
    home_set: bool,
    /// Directory with fake `docker` / `docker-compose` scripts, used as PATH
    fake_bin: Option<PathBuf>,
    /// Exit code from last command execution
    last_exit_code: Option<i32>,
    /// Stdout from last command execution
    last_stdout: String,
    /// Stderr from last command execution
    last_stderr: String,
}

impl PerfizWorld {
    /// Get or create the temporary directory for this scenario
    pub fn ensure_temp_dir(&mut self) {
        if self.temp_dir.is_none() {
            let dir = TempDir::new().expect("Failed to create temp directory");
            fs::create_dir_all(dir.path().join("home")).expect("Failed to create home");
            fs::create_dir_all(dir.path().join("project")).expect("Failed to create project");
            self.temp_dir = Some(dir);
            self.home_set = true;
        }
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_dir
            .as_ref()
            .expect("Temp dir not initialized")
            .path()
            .to_path_buf()
    }

    pub fn home(&self) -> PathBuf {
        self.temp_path().join("home")
    }

    pub fn project(&self) -> PathBuf {
        self.temp_path().join("project")
    }
}

// ============================================================================
// GIVEN STEPS - Fixtures
// ============================================================================

#[given("a perfiz home with templates")]
async fn given_home_with_templates(world: &mut PerfizWorld) {
    world.ensure_temp_dir();
    let templates = world.home().join(home::TEMPLATES_DIR);
    fs::create_dir_all(&templates).expect("Failed to create templates dir");
    for template in INIT_TEMPLATES {
        fs::write(
            templates.join(template.name),
            format!("# template {}\n", template.name),
        )
        .expect("Failed to write template");
    }
}

#[given(expr = "a perfiz home with version {string}")]
async fn given_home_with_version(world: &mut PerfizWorld, version: String) {
    world.ensure_temp_dir();
    fs::write(world.home().join(home::VERSION_FILE), format!("{version}\n"))
        .expect("Failed to write version file");
}

#[given("PERFIZ_HOME is not set")]
async fn given_home_unset(world: &mut PerfizWorld) {
    world.ensure_temp_dir();
    world.home_set = false;
}

#[given(expr = "the project has a directory {string}")]
async fn given_project_dir(world: &mut PerfizWorld, path: String) {
    world.ensure_temp_dir();
    fs::create_dir_all(world.project().join(path)).expect("Failed to create project dir");
}

#[given(expr = "the project has a perfiz.yml with features dir {string}")]
async fn given_project_config(world: &mut PerfizWorld, features_dir: String) {
    world.ensure_temp_dir();
    fs::write(
        world.project().join("perfiz.yml"),
        format!("karateFeaturesDir: {features_dir}\n"),
    )
    .expect("Failed to write perfiz.yml");
}

#[cfg(unix)]
fn install_script(path: PathBuf, script: &str) {
    use std::os::unix::fs::PermissionsExt;
    fs::write(&path, script).expect("Failed to write fake tool");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake tool executable");
}

/// Fake docker whose `network inspect` follows the scenario.
#[cfg(unix)]
#[given(expr = "a fake docker where the perfiz network is {word}")]
async fn given_fake_docker(world: &mut PerfizWorld, state: String) {
    world.ensure_temp_dir();
    let bin = world.temp_path().join("bin");
    fs::create_dir_all(&bin).expect("Failed to create bin dir");

    let network_exit = if state == "up" { 0 } else { 1 };
    install_script(
        bin.join("docker"),
        &format!(
            "#!/bin/sh\ncase \"$1\" in\n  --version) echo \"Docker version 20.10.8, build 3967b7d\" ;;\n  network) exit {network_exit} ;;\n  run) echo \"Simulation PerfizSimulation started\" ;;\nesac\n"
        ),
    );
    install_script(
        bin.join("docker-compose"),
        "#!/bin/sh\ncase \"$1\" in\n  --version) echo \"docker-compose version 1.29.2, build 5becea4c\" ;;\n  *) echo \"compose $*\" ;;\nesac\n",
    );
    world.fake_bin = Some(bin);
}

// ============================================================================
// WHEN STEPS - CLI Command Execution
// ============================================================================

#[allow(deprecated)]
fn perfiz_cmd() -> Command {
    Command::cargo_bin("perfiz").expect("Failed to find perfiz binary")
}

#[when(expr = "I run perfiz {string}")]
async fn when_run_perfiz(world: &mut PerfizWorld, args: String) {
    world.ensure_temp_dir();

    let mut cmd = perfiz_cmd();
    cmd.args(args.split_whitespace())
        .current_dir(world.project())
        .env_remove("PERFIZ_LOG");

    if world.home_set {
        cmd.env(PERFIZ_HOME_ENV_VARIABLE, world.home());
    } else {
        cmd.env_remove(PERFIZ_HOME_ENV_VARIABLE);
    }
    if let Some(bin) = &world.fake_bin {
        cmd.env("PATH", bin);
    }

    let output = cmd.output().expect("Failed to execute perfiz");
    world.last_exit_code = Some(output.status.code().unwrap_or(-1));
    world.last_stdout = String::from_utf8_lossy(&output.stdout).to_string();
    world.last_stderr = String::from_utf8_lossy(&output.stderr).to_string();
}

// ============================================================================
// THEN STEPS - Assertions
// ============================================================================

#[then(expr = "the exit code should be {int}")]
async fn then_exit_code(world: &mut PerfizWorld, expected: i32) {
    assert_eq!(
        world.last_exit_code,
        Some(expected),
        "Unexpected exit code.\nstdout: {}\nstderr: {}",
        world.last_stdout,
        world.last_stderr
    );
}

#[then(expr = "stdout should contain {string}")]
async fn then_stdout_contains(world: &mut PerfizWorld, expected: String) {
    assert!(
        world.last_stdout.contains(&expected),
        "Expected stdout to contain '{}', got:\n{}",
        expected,
        world.last_stdout
    );
}

#[then(expr = "stderr should contain {string}")]
async fn then_stderr_contains(world: &mut PerfizWorld, expected: String) {
    assert!(
        world.last_stderr.contains(&expected),
        "Expected stderr to contain '{}', got:\n{}",
        expected,
        world.last_stderr
    );
}

#[then(expr = "the project file {string} should contain {string}")]
async fn then_project_file_contains(world: &mut PerfizWorld, path: String, expected: String) {
    let content = fs::read_to_string(world.project().join(&path))
        .unwrap_or_else(|e| panic!("Failed to read {path}: {e}"));
    assert!(
        content.contains(&expected),
        "Expected {path} to contain '{expected}', got:\n{content}"
    );
}

#[then(expr = "the project path {string} should exist")]
async fn then_path_exists(world: &mut PerfizWorld, path: String) {
    assert!(world.project().join(&path).exists(), "{path} should exist");
}

#[then(expr = "the project path {string} should not exist")]
async fn then_path_missing(world: &mut PerfizWorld, path: String) {
    assert!(!world.project().join(&path).exists(), "{path} should not exist");
}

// ============================================================================
// MAIN FUNCTION
// ============================================================================

#[tokio::main]
async fn main() {
    // Filter out @unix tagged scenarios on non-Unix platforms
    #[cfg(unix)]
    {
        PerfizWorld::run("features/").await;
    }

    #[cfg(not(unix))]
    {
        PerfizWorld::cucumber()
            .filter_run("features/", |_feature, _rule, scenario| {
                !scenario.tags.iter().any(|tag| tag.to_lowercase() == "unix")
            })
            .await;
    }
}
