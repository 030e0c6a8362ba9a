//! Argument vectors for the docker and compose invocations perfiz makes.

use perfiz_types::{
    home, UserIds, DOCKER_NETWORK, GATLING_CONTAINER_NAME, GATLING_RESULTS_DIR, MAVEN_IMAGE,
};
use std::path::Path;

const CONTAINER_MAVEN_HOME: &str = "/var/maven";
const CONTAINER_MAVEN_REPO: &str = "/var/maven/.m2";
const CONTAINER_WORKDIR: &str = "/usr/src/performance-testing";
const CONTAINER_RESULTS: &str = "/usr/src/performance-testing/results";
const CONTAINER_FEATURES: &str = "/usr/src/karate-features";
const CONTAINER_CONFIG: &str = "/usr/src/perfiz.yml";

/// Everything `docker run` needs to execute the Gatling suite.
#[derive(Debug, Clone)]
pub struct GatlingRun<'a> {
    pub perfiz_home: &'a Path,
    pub project_dir: &'a Path,
    pub features_dir: &'a Path,
    pub config_file: &'a Path,
    pub karate_env: Option<&'a str>,
    pub simulation_class: &'a str,

    /// Host user the container runs as, so results stay owned by the caller.
    pub user: Option<UserIds>,
}

/// Arguments to `docker` (without the `docker` itself).
pub fn gatling_run_args(run: &GatlingRun<'_>) -> Vec<String> {
    let maven_repo = run.perfiz_home.join(home::MAVEN_REPO_DIR);
    let results_dir = run.project_dir.join(GATLING_RESULTS_DIR);

    let mut args: Vec<String> = vec![
        "run".into(),
        "--rm".into(),
        "--name".into(),
        GATLING_CONTAINER_NAME.into(),
    ];

    for (host, container) in [
        (maven_repo.as_path(), CONTAINER_MAVEN_REPO),
        (run.perfiz_home, CONTAINER_MAVEN_HOME),
        (results_dir.as_path(), CONTAINER_RESULTS),
        (run.perfiz_home, CONTAINER_WORKDIR),
        (run.features_dir, CONTAINER_FEATURES),
        (run.config_file, CONTAINER_CONFIG),
    ] {
        args.push("-v".into());
        args.push(volume(host, container));
    }

    args.extend([
        "-e".to_string(),
        format!("KARATE_FEATURES={CONTAINER_FEATURES}"),
        "-e".to_string(),
        format!("MAVEN_CONFIG={CONTAINER_MAVEN_REPO}"),
        "-w".to_string(),
        CONTAINER_WORKDIR.to_string(),
    ]);
    if let Some(user) = run.user {
        args.push("--user".into());
        args.push(format!("{}:{}", user.uid, user.gid));
    }
    args.extend([
        "--network".to_string(),
        DOCKER_NETWORK.to_string(),
        MAVEN_IMAGE.to_string(),
        "mvn".to_string(),
        "clean".to_string(),
        "test-compile".to_string(),
        "gatling:test".to_string(),
        format!("-DPERFIZ={CONTAINER_CONFIG}"),
        format!("-Duser.home={CONTAINER_MAVEN_HOME}"),
    ]);

    if let Some(env) = run.karate_env {
        args.push(format!("-Dkarate.env={env}"));
    }
    args.push(format!("-Dgatling.simulationClass={}", run.simulation_class));

    args
}

fn volume(host: &Path, container: &str) -> String {
    format!("{}:{container}", host.display())
}

pub fn network_inspect_args(network: &str) -> Vec<String> {
    vec!["network".into(), "inspect".into(), network.into()]
}

/// Contents of the env file docker-compose reads on `start`.
pub fn compose_env_file(project_dir: &Path) -> String {
    format!("PROJECT_DIR={}", project_dir.display())
}

/// How docker-compose is invoked on this host.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComposeLauncher {
    /// The `docker-compose` binary.
    Standalone,
    /// The `docker compose` CLI plugin.
    Plugin,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComposeAction {
    Up,
    Down,
}

impl ComposeLauncher {
    /// Program and leading arguments, e.g. `["docker", "compose"]`.
    pub fn program(self) -> Vec<String> {
        match self {
            ComposeLauncher::Standalone => vec!["docker-compose".into()],
            ComposeLauncher::Plugin => vec!["docker".into(), "compose".into()],
        }
    }

    pub fn version_argv(self) -> Vec<String> {
        let mut argv = self.program();
        argv.push("--version".into());
        argv
    }

    /// Full argv for bringing the monitoring stack up or down.
    pub fn argv(self, perfiz_home: &Path, action: ComposeAction) -> Vec<String> {
        let mut argv = self.program();
        argv.push("--file".into());
        argv.push(
            perfiz_home
                .join(home::DOCKER_COMPOSE_FILE)
                .display()
                .to_string(),
        );
        argv.push("--env-file".into());
        argv.push(
            perfiz_home
                .join(home::DOCKER_COMPOSE_ENV_FILE)
                .display()
                .to_string(),
        );
        match action {
            ComposeAction::Up => {
                argv.push("up".into());
                argv.push("-d".into());
            }
            ComposeAction::Down => argv.push("down".into()),
        }
        argv
    }
}
