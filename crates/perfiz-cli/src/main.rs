use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use perfiz_adapters::{PathLocator, StdEnv, StdHostProbe, StdProcessRunner};
use perfiz_app::{
    render_banner, DiagnosticsRequest, DiagnosticsUseCase, InitRequest, InitUseCase,
    LoadTestRequest, LoadTestUseCase, ResetRequest, ResetUseCase, StartRequest, StartUseCase,
    StopUseCase, VersionRequest, VersionUseCase,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Overrides `-v`/`-q` with a full `EnvFilter` directive.
const LOG_ENV_VARIABLE: &str = "PERFIZ_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "perfiz",
    version,
    about = "A Dockerised Performance Test Setup",
    long_about = "A Dockerised API Performance Test Setup based on Gatling with Grafana \
                  Dashboards and Prometheus Monitoring.\n\
                  Complete documentation is available at https://perfiz.com"
)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add Perfiz config templates and dirs to the current project.
    Init,

    /// Start the Grafana, Prometheus and InfluxDB monitoring containers.
    Start,

    /// Run the Gatling performance test described by a perfiz config file.
    Test {
        /// Perfiz config file (default: perfiz.yml)
        config: Option<PathBuf>,
    },

    /// Stop all Perfiz containers.
    Stop,

    /// Remove project-specific Grafana, InfluxDB, Prometheus and Gatling data.
    Reset,

    /// Print the version of Perfiz and of this CLI.
    Version,

    /// Gather setup information to report issues.
    Diagnostics,
}

fn main() -> ExitCode {
    if let Err(err) = real_main() {
        eprintln!("{err:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let project_dir = std::env::current_dir().context("failed to read current directory")?;

    match cli.cmd {
        Command::Init => {
            InitUseCase::new(StdEnv).execute(InitRequest { project_dir })?;
        }

        Command::Start => {
            StartUseCase::new(StdProcessRunner, PathLocator, StdEnv)
                .execute(StartRequest { project_dir })?;
        }

        Command::Test { config } => {
            LoadTestUseCase::new(StdProcessRunner, PathLocator, StdEnv, StdHostProbe)
                .execute(LoadTestRequest {
                    project_dir,
                    config,
                })?;
        }

        Command::Stop => {
            StopUseCase::new(StdProcessRunner, PathLocator, StdEnv).execute()?;
        }

        Command::Reset => {
            ResetUseCase::new(StdProcessRunner).execute(ResetRequest { project_dir })?;
        }

        Command::Version => {
            let info = VersionUseCase::new(StdEnv).execute(VersionRequest {
                cli_version: cli_version(),
            })?;
            print!("{}", render_banner(&info));
        }

        Command::Diagnostics => {
            DiagnosticsUseCase::new(StdProcessRunner, PathLocator, StdEnv, StdHostProbe).execute(
                DiagnosticsRequest {
                    project_dir,
                    cli_version: cli_version(),
                },
            )?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let (filter, directive) = match EnvFilter::try_from_env(LOG_ENV_VARIABLE) {
        Ok(filter) => {
            let directive = filter.to_string();
            (filter, directive)
        }
        Err(_) => (EnvFilter::new(default), default.to_string()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    tracing::debug!("log filter: {directive}");
}

fn cli_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
