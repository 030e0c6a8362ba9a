//! Shared types for perfiz.
//!
//! Design goal: explicit and boring.
//! The config record mirrors the YAML users write; everything else here is
//! the fixed layout that the perfiz home directory and project folder follow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const PERFIZ_HOME_ENV_VARIABLE: &str = "PERFIZ_HOME";
pub const DEFAULT_CONFIG_FILE: &str = "perfiz.yml";

/// Project-side folder created by `perfiz init`.
pub const PERFIZ_FOLDER: &str = "perfiz";
pub const GATLING_CONF: &str = "gatling.conf";
pub const GATLING_CONF_DIR: &str = "perfiz/gatling";
pub const GATLING_RESULTS_DIR: &str = "perfiz/gatling_data/results";
pub const GRAFANA_DASHBOARDS_DIR: &str = "perfiz/dashboards";
pub const PROMETHEUS_CONFIG_DIR: &str = "perfiz/prometheus";

/// Data directories wiped by `perfiz reset`, relative to the project.
pub const DATA_DIRS: [&str; 4] = [
    "perfiz/grafana_data",
    "perfiz/influxdb_data",
    "perfiz/prometheus_data",
    "perfiz/gatling_data",
];

/// Relative locations inside `$PERFIZ_HOME`.
pub mod home {
    pub const TEMPLATES_DIR: &str = "templates";
    pub const DOCKER_COMPOSE_FILE: &str = "docker-compose.yml";
    pub const DOCKER_COMPOSE_ENV_FILE: &str = ".env";
    pub const VERSION_FILE: &str = ".VERSION";
    pub const MAVEN_REPO_DIR: &str = ".m2";
    pub const SIMULATIONS_DIR: &str = "src/test/scala";
    pub const RESOURCES_DIR: &str = "src/test/resources";
}

pub const DOCKER_NETWORK: &str = "perfiz-network";
pub const GATLING_CONTAINER_NAME: &str = "perfiz-gatling";
pub const MAVEN_IMAGE: &str = "maven:3.8-jdk-8";
pub const GRAFANA_URL: &str = "http://localhost:3000";

pub const PERFIZ_GATLING_SIMULATION_CLASS: &str = "org.znsio.perfiz.PerfizSimulation";

/// Simulations shipped with perfiz contain this fragment and are never removed.
pub const PROTECTED_SIMULATION_FRAGMENT: &str = "Perfiz";
pub const SIMULATION_EXTENSION: &str = "scala";

pub const GITIGNORE_HINT: &str = "perfiz/*_data";

/// Minimum version of an external tool.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ToolRequirement {
    pub name: &'static str,
    pub min_major: u32,
    pub min_minor: u32,
}

impl ToolRequirement {
    /// Rendered the way users see it in error messages, e.g. `20.10.0`.
    pub fn display_min(&self) -> String {
        format!("{}.{}.0", self.min_major, self.min_minor)
    }
}

pub const DOCKER: ToolRequirement = ToolRequirement {
    name: "docker",
    min_major: 20,
    min_minor: 10,
};

pub const DOCKER_COMPOSE: ToolRequirement = ToolRequirement {
    name: "docker-compose",
    min_major: 1,
    min_minor: 29,
};

/// A template from `$PERFIZ_HOME/templates` staged into the project by `init`.
///
/// The template is copied only when `guard` does not exist yet. For most
/// templates the guard is the target itself; the dashboard sample is guarded
/// by its directory so users who removed the sample do not get it back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub target: &'static str,
    pub guard: &'static str,
}

pub const INIT_TEMPLATES: [Template; 4] = [
    Template {
        name: DEFAULT_CONFIG_FILE,
        target: DEFAULT_CONFIG_FILE,
        guard: DEFAULT_CONFIG_FILE,
    },
    Template {
        name: GATLING_CONF,
        target: "perfiz/gatling/gatling.conf",
        guard: "perfiz/gatling/gatling.conf",
    },
    Template {
        name: "dashboard.json",
        target: "perfiz/dashboards/dashboard.json",
        guard: GRAFANA_DASHBOARDS_DIR,
    },
    Template {
        name: "prometheus.yml",
        target: "perfiz/prometheus/prometheus.yml",
        guard: "perfiz/prometheus/prometheus.yml",
    },
];

/// Numeric user and group of the invoking user.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserIds {
    pub uid: u32,
    pub gid: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
}

/// The `perfiz.yml` record.
///
/// Directories are relative to the config file. Empty strings in optional
/// fields mean "not set"; templates ship with them blank.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[serde(rename_all = "camelCase")]
pub struct PerfizConfig {
    pub karate_features_dir: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karate_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gatling_simulations_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gatling_simulation_class: Option<String>,
}

impl PerfizConfig {
    pub fn karate_env(&self) -> Option<&str> {
        non_blank(self.karate_env.as_deref())
    }

    pub fn gatling_simulations_dir(&self) -> Option<&str> {
        non_blank(self.gatling_simulations_dir.as_deref())
    }

    /// Configured simulation class, or the one bundled with perfiz.
    pub fn gatling_simulation_class(&self) -> &str {
        non_blank(self.gatling_simulation_class.as_deref())
            .unwrap_or(PERFIZ_GATLING_SIMULATION_CLASS)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
