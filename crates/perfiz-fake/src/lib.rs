//! Fakes for the perfiz adapter traits.
//!
//! Every fake is cheap to clone; clones share state so a test can keep a
//! handle and inspect what the code under test did.

use perfiz_adapters::{
    AdapterError, CommandSpec, EnvSource, HostProbe, LineSink, OutputStream, ProcessRunner,
    RunResult, StreamResult, ToolLocator,
};
use perfiz_types::{HostInfo, UserIds};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Scripted outcome of one command.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// The process could not be started at all.
    SpawnError(String),
}

impl FakeResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        FakeResponse::Exit {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        FakeResponse::Exit {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

#[derive(Debug, Default)]
struct RunnerState {
    /// Checked in insertion order; the first matching prefix wins.
    responses: Vec<(Vec<String>, FakeResponse)>,
    calls: Vec<CommandSpec>,
}

/// A [`ProcessRunner`] that answers from a script and records every call.
///
/// Commands without a scripted answer fail as if the program was missing.
#[derive(Debug, Default, Clone)]
pub struct FakeProcessRunner {
    state: Arc<Mutex<RunnerState>>,
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every command whose argv starts with `prefix`.
    pub fn respond(self, prefix: &[&str], response: FakeResponse) -> Self {
        self.lock()
            .responses
            .push((prefix.iter().map(|s| s.to_string()).collect(), response));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.lock().calls.clone()
    }

    /// Recorded argvs, for tests that only care about arguments.
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.lock().calls.iter().map(|c| c.argv.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RunnerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn answer(&self, spec: &CommandSpec) -> Result<FakeResponse, AdapterError> {
        if spec.argv.is_empty() {
            return Err(AdapterError::EmptyArgv);
        }

        let mut state = self.lock();
        state.calls.push(spec.clone());
        state
            .responses
            .iter()
            .find(|(prefix, _)| spec.argv.starts_with(prefix))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| {
                AdapterError::Other(anyhow::anyhow!("failed to run {:?}: not found", spec.argv))
            })
    }
}

impl ProcessRunner for FakeProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<RunResult, AdapterError> {
        match self.answer(spec)? {
            FakeResponse::Exit {
                code,
                stdout,
                stderr,
            } => Ok(RunResult {
                wall_ms: 0,
                exit_code: Some(code),
                stdout: stdout.into_bytes(),
                stderr: stderr.into_bytes(),
            }),
            FakeResponse::SpawnError(message) => Err(AdapterError::Other(anyhow::anyhow!(message))),
        }
    }

    fn stream(
        &self,
        spec: &CommandSpec,
        sink: &dyn LineSink,
    ) -> Result<StreamResult, AdapterError> {
        match self.answer(spec)? {
            FakeResponse::Exit {
                code,
                stdout,
                stderr,
            } => {
                for line in stdout.lines() {
                    sink.line(OutputStream::Stdout, line);
                }
                for line in stderr.lines() {
                    sink.line(OutputStream::Stderr, line);
                }
                Ok(StreamResult {
                    wall_ms: 0,
                    exit_code: Some(code),
                })
            }
            FakeResponse::SpawnError(message) => Err(AdapterError::Other(anyhow::anyhow!(message))),
        }
    }
}

/// A [`ToolLocator`] that knows only the tools it was given.
#[derive(Debug, Default, Clone)]
pub struct FakeToolLocator {
    tools: BTreeMap<String, PathBuf>,
}

impl FakeToolLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, name: &str) -> Self {
        self.tools
            .insert(name.to_string(), PathBuf::from("/usr/bin").join(name));
        self
    }
}

impl ToolLocator for FakeToolLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.tools.get(name).cloned()
    }
}

#[derive(Debug, Default, Clone)]
pub struct FakeEnv {
    vars: BTreeMap<String, String>,
}

impl FakeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }
}

impl EnvSource for FakeEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[derive(Debug, Clone)]
pub struct FakeHostProbe {
    pub info: HostInfo,
    pub user: Option<UserIds>,
}

impl Default for FakeHostProbe {
    fn default() -> Self {
        Self {
            info: HostInfo {
                os: "linux".to_string(),
                arch: "x86_64".to_string(),
            },
            user: Some(UserIds {
                uid: 1000,
                gid: 1000,
            }),
        }
    }
}

impl HostProbe for FakeHostProbe {
    fn host_info(&self) -> HostInfo {
        self.info.clone()
    }

    fn user_ids(&self) -> Option<UserIds> {
        self.user
    }
}
