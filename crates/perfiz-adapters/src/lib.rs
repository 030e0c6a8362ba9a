//! Std adapters for perfiz.
//!
//! In clean-arch terms: this is where we touch the world.

pub mod fs;
mod host;
mod tools;

pub use host::{HostProbe, StdHostProbe};
pub use tools::{EnvSource, PathLocator, StdEnv, ToolLocator};

use anyhow::Context;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    pub argv: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub wall_ms: u64,

    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// stdout followed by stderr, the way a terminal would show them.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout_lossy();
        out.push_str(&String::from_utf8_lossy(&self.stderr));
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamResult {
    pub wall_ms: u64,
    pub exit_code: Option<i32>,
}

impl StreamResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Receives subprocess output one line at a time, from both pipes at once.
pub trait LineSink: Sync {
    fn line(&self, stream: OutputStream, line: &str);
}

/// Forwards every line to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LineSink for TracingSink {
    fn line(&self, stream: OutputStream, line: &str) {
        match stream {
            OutputStream::Stdout => tracing::info!("{line}"),
            OutputStream::Stderr => tracing::warn!("{line}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("command argv must not be empty")]
    EmptyArgv,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub trait ProcessRunner {
    /// Run to completion and capture both output streams.
    fn run(&self, spec: &CommandSpec) -> Result<RunResult, AdapterError>;

    /// Run to completion, handing each output line to `sink` as it is produced.
    fn stream(&self, spec: &CommandSpec, sink: &dyn LineSink)
    -> Result<StreamResult, AdapterError>;
}

#[derive(Debug, Default, Clone)]
pub struct StdProcessRunner;

impl ProcessRunner for StdProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<RunResult, AdapterError> {
        let mut cmd = build_command(spec)?;
        let start = Instant::now();

        let out = cmd
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run {:?}", spec.argv))
            .map_err(AdapterError::Other)?;

        Ok(RunResult {
            wall_ms: start.elapsed().as_millis() as u64,
            exit_code: out.status.code(),
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }

    fn stream(
        &self,
        spec: &CommandSpec,
        sink: &dyn LineSink,
    ) -> Result<StreamResult, AdapterError> {
        let mut cmd = build_command(spec)?;
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn {:?}", spec.argv))
            .map_err(AdapterError::Other)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are drained at the same time; a child blocked on a full
        // stderr pipe would otherwise never close stdout.
        std::thread::scope(|scope| {
            if let Some(out) = stdout {
                scope.spawn(move || forward_lines(out, OutputStream::Stdout, sink));
            }
            if let Some(err) = stderr {
                scope.spawn(move || forward_lines(err, OutputStream::Stderr, sink));
            }
        });

        let status = child
            .wait()
            .with_context(|| format!("failed to wait for {:?}", spec.argv))
            .map_err(AdapterError::Other)?;

        Ok(StreamResult {
            wall_ms: start.elapsed().as_millis() as u64,
            exit_code: status.code(),
        })
    }
}

fn build_command(spec: &CommandSpec) -> Result<Command, AdapterError> {
    let (program, args) = spec.argv.split_first().ok_or(AdapterError::EmptyArgv)?;

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }

    for (k, v) in &spec.env {
        cmd.env(k, v);
    }

    Ok(cmd)
}

fn forward_lines<R: Read>(reader: R, stream: OutputStream, sink: &dyn LineSink) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                sink.line(stream, line.trim_end_matches(['\n', '\r']));
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
}
