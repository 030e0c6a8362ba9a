//! `perfiz init`: stage config templates into the project.

use crate::environment::require_home;
use perfiz_adapters::fs::{self, Staged};
use perfiz_adapters::EnvSource;
use perfiz_types::{home, Template, GITIGNORE_HINT, INIT_TEMPLATES, PERFIZ_FOLDER};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct InitRequest {
    pub project_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct InitOutcome {
    /// One entry per template, in staging order.
    pub templates: Vec<(Template, Staged)>,
}

impl InitOutcome {
    pub fn copied(&self) -> usize {
        self.templates
            .iter()
            .filter(|(_, staged)| *staged == Staged::Copied)
            .count()
    }
}

pub struct InitUseCase<E: EnvSource> {
    env: E,
}

impl<E: EnvSource> InitUseCase<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    pub fn execute(&self, req: InitRequest) -> anyhow::Result<InitOutcome> {
        tracing::info!("Starting Init");
        let perfiz_home = require_home(&self.env)?;
        let templates_dir = perfiz_home.join(home::TEMPLATES_DIR);

        let mut templates = Vec::with_capacity(INIT_TEMPLATES.len());
        for template in INIT_TEMPLATES {
            let source = templates_dir.join(template.name);
            let target = req.project_dir.join(template.target);
            let guard = req.project_dir.join(template.guard);

            let staged = fs::copy_if_missing(&source, &target, &guard)?;
            match staged {
                Staged::Copied => tracing::info!("{} not found. Adding template.", template.target),
                Staged::AlreadyPresent => {
                    tracing::info!("{} is already present. Skipping.", template.guard)
                }
            }
            templates.push((template, staged));
        }

        let perfiz_folder = req.project_dir.join(PERFIZ_FOLDER);
        if fs::is_dir(&perfiz_folder) {
            tracing::info!(
                "Setting ./{PERFIZ_FOLDER} permissions to 0777 to allow Docker containers to access its contents"
            );
            fs::open_to_all(&perfiz_folder)?;
        }

        tracing::info!("Init Completed");
        tracing::info!(
            "Please add below line to your .gitignore to avoid checking in Prometheus and Grafana Data to version control"
        );
        tracing::info!("{GITIGNORE_HINT}");

        Ok(InitOutcome { templates })
    }
}
