//! `perfiz diagnostics`: collect setup details for bug reports.
//!
//! Unlike the other commands, problems with individual tools are reported in
//! the output instead of aborting, so a broken setup can still be described.

use crate::environment::{compose_launcher, perfiz_version, require_home, tool_version};
use perfiz_adapters::{fs, EnvSource, HostProbe, ProcessRunner, ToolLocator};
use perfiz_types::{HostInfo, DOCKER, PERFIZ_FOLDER};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DiagnosticsRequest {
    pub project_dir: PathBuf,
    pub cli_version: String,
}

#[derive(Debug, Clone)]
pub struct DiagnosticsReport {
    pub perfiz_version: String,
    pub cli_version: String,

    /// `--version` output, or why it could not be obtained.
    pub docker: Result<String, String>,
    pub docker_compose: Result<String, String>,
    pub host: HostInfo,

    /// Permissions of `./perfiz`, e.g. `drwxrwxrwx`.
    pub perfiz_folder: Result<String, String>,
}

pub struct DiagnosticsUseCase<R, L, E, H>
where
    R: ProcessRunner,
    L: ToolLocator,
    E: EnvSource,
    H: HostProbe,
{
    runner: R,
    locator: L,
    env: E,
    host: H,
}

impl<R, L, E, H> DiagnosticsUseCase<R, L, E, H>
where
    R: ProcessRunner,
    L: ToolLocator,
    E: EnvSource,
    H: HostProbe,
{
    pub fn new(runner: R, locator: L, env: E, host: H) -> Self {
        Self {
            runner,
            locator,
            env,
            host,
        }
    }

    pub fn execute(&self, req: DiagnosticsRequest) -> anyhow::Result<DiagnosticsReport> {
        tracing::info!("*************** RUNNING DIAGNOSTICS ******************");
        let perfiz_home = require_home(&self.env)?;

        let report = DiagnosticsReport {
            perfiz_version: perfiz_version(&perfiz_home),
            cli_version: req.cli_version,
            docker: self.docker_version(),
            docker_compose: self.compose_version(),
            host: self.host.host_info(),
            perfiz_folder: fs::permissions_string(&req.project_dir.join(PERFIZ_FOLDER))
                .map_err(|e| e.to_string()),
        };

        tracing::info!("Perfiz Version: {}", report.perfiz_version);
        tracing::info!("Perfiz Cli Version: {}", report.cli_version);
        log_tool("Docker version", &report.docker);
        log_tool("docker-compose version", &report.docker_compose);
        tracing::info!("OS: {}", report.host.os);
        tracing::info!("Arch: {}", report.host.arch);
        match &report.perfiz_folder {
            Ok(mode) => tracing::info!("Perfiz folder permissions: {mode}"),
            Err(err) => tracing::warn!("Error reading permissions of Perfiz Folder. {err}"),
        }
        tracing::info!("************* DIAGNOSTICS COMPLETED ******************");

        Ok(report)
    }

    fn docker_version(&self) -> Result<String, String> {
        let path = self
            .locator
            .locate(DOCKER.name)
            .ok_or_else(|| format!("{} not found, please install", DOCKER.name))?;
        tracing::info!("{} command located: {}", DOCKER.name, path.display());
        tool_version(&self.runner, &[DOCKER.name.to_string(), "--version".to_string()])
            .map_err(|e| format!("{e:#}"))
    }

    fn compose_version(&self) -> Result<String, String> {
        let launcher = compose_launcher(&self.locator).map_err(|e| e.to_string())?;
        tool_version(&self.runner, &launcher.version_argv()).map_err(|e| format!("{e:#}"))
    }
}

fn log_tool(label: &str, version: &Result<String, String>) {
    match version {
        Ok(version) => tracing::info!("{label}: {version}"),
        Err(err) => tracing::warn!("{label}: {err}"),
    }
}
