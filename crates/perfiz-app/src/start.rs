//! `perfiz start` and `perfiz stop`: the monitoring stack.

use crate::environment::{check_compose, check_tool, compose_launcher, require_home};
use crate::run_captured;
use perfiz_adapters::{fs, EnvSource, ProcessRunner, ToolLocator};
use perfiz_domain::{compose_env_file, ComposeAction, ComposeLauncher};
use perfiz_types::{home, DOCKER, GRAFANA_URL};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StartRequest {
    /// Mounted into the stack as `PROJECT_DIR`.
    pub project_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ComposeOutcome {
    pub launcher: ComposeLauncher,
    pub argv: Vec<String>,
    pub output: String,
}

pub struct StartUseCase<R: ProcessRunner, L: ToolLocator, E: EnvSource> {
    runner: R,
    locator: L,
    env: E,
}

impl<R: ProcessRunner, L: ToolLocator, E: EnvSource> StartUseCase<R, L, E> {
    pub fn new(runner: R, locator: L, env: E) -> Self {
        Self {
            runner,
            locator,
            env,
        }
    }

    pub fn execute(&self, req: StartRequest) -> anyhow::Result<ComposeOutcome> {
        tracing::info!("Starting Perfiz...");
        let perfiz_home = require_home(&self.env)?;
        check_tool(&self.runner, &self.locator, &DOCKER)?;
        let launcher = check_compose(&self.runner, &self.locator)?;

        let env_file = perfiz_home.join(home::DOCKER_COMPOSE_ENV_FILE);
        let contents = compose_env_file(&req.project_dir);
        tracing::info!(
            "Writing {contents} to docker-compose env file: {}",
            env_file.display()
        );
        fs::atomic_write(&env_file, contents.as_bytes())?;

        tracing::info!("Starting Perfiz Docker Containers...");
        let argv = launcher.argv(&perfiz_home, ComposeAction::Up);
        let output = run_captured(&self.runner, &argv)?;
        tracing::info!("Navigate to {GRAFANA_URL} for Grafana");

        Ok(ComposeOutcome {
            launcher,
            argv,
            output,
        })
    }
}

pub struct StopUseCase<R: ProcessRunner, L: ToolLocator, E: EnvSource> {
    runner: R,
    locator: L,
    env: E,
}

impl<R: ProcessRunner, L: ToolLocator, E: EnvSource> StopUseCase<R, L, E> {
    pub fn new(runner: R, locator: L, env: E) -> Self {
        Self {
            runner,
            locator,
            env,
        }
    }

    pub fn execute(&self) -> anyhow::Result<ComposeOutcome> {
        tracing::info!("Stopping Perfiz...");
        let perfiz_home = require_home(&self.env)?;
        let launcher = compose_launcher(&self.locator)?;

        let argv = launcher.argv(&perfiz_home, ComposeAction::Down);
        let output = run_captured(&self.runner, &argv)?;

        Ok(ComposeOutcome {
            launcher,
            argv,
            output,
        })
    }
}
