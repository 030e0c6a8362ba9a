//! `perfiz reset`: wipe project-local monitoring data.

use crate::environment::network_exists;
use perfiz_adapters::{fs, ProcessRunner};
use perfiz_error::PerfizError;
use perfiz_types::{DATA_DIRS, DOCKER_NETWORK, PERFIZ_FOLDER};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ResetRequest {
    pub project_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ResetOutcome {
    /// Data directories that existed and were deleted.
    pub removed: Vec<PathBuf>,
}

pub struct ResetUseCase<R: ProcessRunner> {
    runner: R,
}

impl<R: ProcessRunner> ResetUseCase<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn execute(&self, req: ResetRequest) -> anyhow::Result<ResetOutcome> {
        if network_exists(&self.runner, DOCKER_NETWORK) {
            return Err(PerfizError::StackRunning.into());
        }

        if !fs::is_dir(&req.project_dir.join(PERFIZ_FOLDER)) {
            return Err(PerfizError::ProjectFolderMissing.into());
        }

        let mut removed = Vec::new();
        for dir in DATA_DIRS {
            tracing::info!("Deleting ./{dir}");
            let path = req.project_dir.join(dir);
            if fs::remove_dir_if_exists(&path)? {
                removed.push(path);
            }
        }

        Ok(ResetOutcome { removed })
    }
}
