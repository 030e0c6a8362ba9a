//! Loading and validation of `perfiz.yml`.
//!
//! Directories in the file are relative to the file itself, so the
//! resolved form carries absolute paths ready to be mounted into a container.

use perfiz_error::PerfizError;
use perfiz_types::{PerfizConfig, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};

const FEATURES_DIR_FIELD: &str = "karateFeaturesDir";
const SIMULATIONS_DIR_FIELD: &str = "gatlingSimulationsDir";

/// Validated configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub config_path: PathBuf,
    pub features_dir: PathBuf,
    pub simulations_dir: Option<PathBuf>,
    pub karate_env: Option<String>,
    pub simulation_class: String,
}

/// Pick the config file for a `test` run.
///
/// Without an argument the project's `perfiz.yml` is used. Relative
/// arguments are taken relative to `project_dir`.
pub fn resolve_config_path(project_dir: &Path, arg: Option<&Path>) -> Result<PathBuf, PerfizError> {
    match arg {
        None => {
            let path = project_dir.join(DEFAULT_CONFIG_FILE);
            if !path.is_file() {
                return Err(PerfizError::DefaultConfigMissing {
                    file: DEFAULT_CONFIG_FILE.to_string(),
                });
            }
            Ok(path)
        }
        Some(arg) => {
            let path = project_dir.join(arg);
            if !path.is_file() {
                return Err(PerfizError::ConfigMissing {
                    path: arg.display().to_string(),
                });
            }
            Ok(path)
        }
    }
}

pub fn load_config(path: &Path) -> Result<PerfizConfig, PerfizError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PerfizError::io(format!("read {}", path.display()), e))?;
    parse_config(path, &content)
}

pub fn parse_config(path: &Path, content: &str) -> Result<PerfizConfig, PerfizError> {
    serde_yaml::from_str(content).map_err(|e| PerfizError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Check the directories named in `config` and make them absolute.
pub fn resolve(config: &PerfizConfig, config_path: &Path) -> Result<ResolvedConfig, PerfizError> {
    let config_path = std::path::absolute(config_path)
        .map_err(|e| PerfizError::io(format!("resolve {}", config_path.display()), e))?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("/"));
    let file = config_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    if config.karate_features_dir.trim().is_empty() {
        return Err(PerfizError::ConfigParse {
            path: config_path.clone(),
            message: format!("{FEATURES_DIR_FIELD} must not be empty"),
        });
    }
    let features_dir = existing_dir(base, &file, FEATURES_DIR_FIELD, &config.karate_features_dir)?;

    let simulations_dir = config
        .gatling_simulations_dir()
        .map(|dir| existing_dir(base, &file, SIMULATIONS_DIR_FIELD, dir))
        .transpose()?;

    tracing::debug!(
        features = %features_dir.display(),
        simulations = ?simulations_dir,
        "resolved {file}"
    );

    Ok(ResolvedConfig {
        features_dir,
        simulations_dir,
        karate_env: config.karate_env().map(str::to_string),
        simulation_class: config.gatling_simulation_class().to_string(),
        config_path,
    })
}

/// Read, parse and validate a config file in one go.
pub fn load(config_path: &Path) -> Result<ResolvedConfig, PerfizError> {
    let config = load_config(config_path)?;
    resolve(&config, config_path)
}

fn existing_dir(
    base: &Path,
    file: &str,
    field: &'static str,
    value: &str,
) -> Result<PathBuf, PerfizError> {
    let resolved = base.join(value.trim());
    if !resolved.is_dir() {
        return Err(PerfizError::Configuration {
            file: file.to_string(),
            field,
            value: value.to_string(),
            resolved: resolved.display().to_string(),
        });
    }
    Ok(resolved)
}
