//! Checks on the host environment shared by several commands.

use anyhow::Context;
use perfiz_adapters::{CommandSpec, EnvSource, ProcessRunner, ToolLocator};
use perfiz_domain::{check_version, display_argv, network_inspect_args, ComposeLauncher};
use perfiz_error::PerfizError;
use perfiz_types::{home, ToolRequirement, DOCKER_COMPOSE, PERFIZ_HOME_ENV_VARIABLE};
use std::path::{Path, PathBuf};

/// The perfiz installation directory from `PERFIZ_HOME`.
pub fn require_home<E: EnvSource>(env: &E) -> Result<PathBuf, PerfizError> {
    let home = env
        .var(PERFIZ_HOME_ENV_VARIABLE)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PerfizError::MissingEnvVar {
            name: PERFIZ_HOME_ENV_VARIABLE.to_string(),
        })?;
    tracing::info!("{PERFIZ_HOME_ENV_VARIABLE}: {home}");
    std::path::absolute(&home)
        .map_err(|e| PerfizError::io(format!("resolve {PERFIZ_HOME_ENV_VARIABLE} {home}"), e))
}

/// Make sure `req.name` is installed and recent enough.
pub fn check_tool<R, L>(runner: &R, locator: &L, req: &ToolRequirement) -> anyhow::Result<PathBuf>
where
    R: ProcessRunner,
    L: ToolLocator,
{
    let path = locator.locate(req.name).ok_or_else(|| PerfizError::ToolNotFound {
        tool: req.name.to_string(),
    })?;
    tracing::info!("{} command located: {}", req.name, path.display());

    let output = tool_version(runner, &[req.name.to_string(), "--version".to_string()])?;
    check_version(&output, req).with_context(|| format!("Error locating {}", req.name))?;
    Ok(path)
}

/// Pick how docker-compose is launched: the standalone binary when it is on
/// PATH, otherwise the `docker compose` plugin.
pub fn compose_launcher<L: ToolLocator>(locator: &L) -> Result<ComposeLauncher, PerfizError> {
    if let Some(path) = locator.locate(DOCKER_COMPOSE.name) {
        tracing::info!("{} command located: {}", DOCKER_COMPOSE.name, path.display());
        return Ok(ComposeLauncher::Standalone);
    }
    if let Some(path) = locator.locate("docker") {
        tracing::debug!("using the compose plugin of {}", path.display());
        return Ok(ComposeLauncher::Plugin);
    }
    Err(PerfizError::ToolNotFound {
        tool: DOCKER_COMPOSE.name.to_string(),
    })
}

/// [`compose_launcher`] plus the docker-compose version check.
pub fn check_compose<R, L>(runner: &R, locator: &L) -> anyhow::Result<ComposeLauncher>
where
    R: ProcessRunner,
    L: ToolLocator,
{
    let launcher = compose_launcher(locator)?;
    let output = tool_version(runner, &launcher.version_argv())?;
    check_version(&output, &DOCKER_COMPOSE)
        .with_context(|| format!("Error locating {}", DOCKER_COMPOSE.name))?;
    Ok(launcher)
}

/// Raw, trimmed output of a `--version` invocation.
pub fn tool_version<R: ProcessRunner>(runner: &R, argv: &[String]) -> anyhow::Result<String> {
    let command = display_argv(argv);
    let unable = || format!("Unable to run {command}, please check your installation.");

    let result = runner
        .run(&CommandSpec::new(argv.to_vec()))
        .with_context(unable)?;
    if !result.success() {
        return Err(PerfizError::ExternalProcess {
            command: command.clone(),
            code: result.exit_code,
        })
        .with_context(unable);
    }
    Ok(result.stdout_lossy().trim().to_string())
}

/// `docker network inspect` succeeds only for existing networks. A docker
/// that cannot be started counts as "no network".
pub fn network_exists<R: ProcessRunner>(runner: &R, network: &str) -> bool {
    let mut argv = vec!["docker".to_string()];
    argv.extend(network_inspect_args(network));

    match runner.run(&CommandSpec::new(argv)) {
        Ok(result) => result.success(),
        Err(err) => {
            tracing::debug!("docker network inspect failed to start: {err}");
            false
        }
    }
}

/// Contents of `$PERFIZ_HOME/.VERSION`, or an empty string when unreadable.
pub fn perfiz_version(perfiz_home: &Path) -> String {
    let path = perfiz_home.join(home::VERSION_FILE);
    match std::fs::read_to_string(&path) {
        Ok(version) => version.trim().to_string(),
        Err(err) => {
            tracing::warn!("Unable to read Perfiz Version File: {}: {err}", path.display());
            String::new()
        }
    }
}
