//! Application layer for perfiz.
//!
//! One use case per command. Use cases coordinate adapters and domain
//! logic; they do not parse CLI flags and never read the process environment
//! or working directory directly.

mod diagnostics;
pub mod environment;
mod init;
mod reset;
mod start;
mod version;

pub use diagnostics::{DiagnosticsReport, DiagnosticsRequest, DiagnosticsUseCase};
pub use init::{InitOutcome, InitRequest, InitUseCase};
pub use load_test::{LoadTestOutcome, LoadTestRequest, LoadTestUseCase};
pub use reset::{ResetOutcome, ResetRequest, ResetUseCase};
pub use start::{ComposeOutcome, StartRequest, StartUseCase, StopUseCase};
pub use version::{render_banner, VersionInfo, VersionRequest, VersionUseCase};

use anyhow::Context;
use perfiz_adapters::{CommandSpec, ProcessRunner};
use perfiz_domain::display_argv;
use perfiz_error::PerfizError;

/// Run a command to completion and log what it printed.
///
/// Returns stdout and stderr combined. A non-zero exit logs the output as a
/// warning and fails with [`PerfizError::ExternalProcess`].
pub(crate) fn run_captured<R: ProcessRunner>(runner: &R, argv: &[String]) -> anyhow::Result<String> {
    let command = display_argv(argv);
    tracing::info!("Command: {command}");

    let result = runner
        .run(&CommandSpec::new(argv.to_vec()))
        .with_context(|| format!("failed to run {command}"))?;
    let output = result.combined_output();

    if !result.success() {
        tracing::warn!("{}", output.trim_end());
        return Err(PerfizError::ExternalProcess {
            command,
            code: result.exit_code,
        }
        .into());
    }

    if !output.trim().is_empty() {
        tracing::info!("{}", output.trim_end());
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfiz_fake::{FakeProcessRunner, FakeResponse};

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn captured_output_is_returned() {
        let runner = FakeProcessRunner::new().respond(
            &["docker-compose"],
            FakeResponse::Exit {
                code: 0,
                stdout: "up\n".to_string(),
                stderr: "pulling\n".to_string(),
            },
        );
        let output = run_captured(&runner, &argv(&["docker-compose", "up"])).unwrap();
        assert_eq!(output, "up\npulling\n");
    }

    #[test]
    fn non_zero_exit_is_an_external_process_error() {
        let runner = FakeProcessRunner::new()
            .respond(&["docker-compose"], FakeResponse::failure(2, "no such file"));
        let err = run_captured(&runner, &argv(&["docker-compose", "down"])).unwrap_err();
        assert_eq!(err.to_string(), "docker-compose down exited with status 2");
    }

    #[test]
    fn spawn_failure_names_the_command() {
        let err = run_captured(&FakeProcessRunner::new(), &argv(&["docker-compose", "down"]))
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to run docker-compose down"));
    }
}
