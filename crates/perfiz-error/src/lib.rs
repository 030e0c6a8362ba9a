//! Unified error type for perfiz.
//!
//! Every failure in perfiz is fatal. The variants below exist so callers
//! (and tests) can tell the failure kinds apart; the CLI only prints them.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PerfizError {
    #[error("Please set {name} environment variable")]
    MissingEnvVar { name: String },

    #[error("{tool} not found, please install")]
    ToolNotFound { tool: String },

    #[error("Current version is {current}. Min version required: {required}")]
    VersionTooLow { current: String, required: String },

    #[error("unable to parse a version number from {output:?}")]
    UnparseableVersion { output: String },

    #[error(
        "Default Config: {file} not found. Please create {file} or provide name of config file as argument. \
         Please see https://github.com/znsio/perfiz for instructions and / or run 'init' command and perfiz \
         will add a config file template to help you get started."
    )]
    DefaultConfigMissing { file: String },

    #[error("Config: {path} not found.")]
    ConfigMissing { path: String },

    #[error("unable to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error(
        "Configuration error in {file}. {field}: {value}. {resolved} is not a directory. \
         Please note that {field} has to be relative to {file} location."
    )]
    Configuration {
        file: String,
        field: &'static str,
        value: String,
        resolved: String,
    },

    #[error(
        "Error locating docker network {network}. Try running perfiz 'start' command before running 'test'."
    )]
    NetworkNotFound { network: String },

    #[error("Perfiz Containers seem to be running. Please run 'stop' command before running 'reset'.")]
    StackRunning,

    #[error(
        "Could not find perfiz folder, please run 'reset' command inside your project where the perfiz folder exists."
    )]
    ProjectFolderMissing,

    #[error("{command} {}", exit_description(.code))]
    ExternalProcess { command: String, code: Option<i32> },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PerfizError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PerfizError::Io {
            context: context.into(),
            source,
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_too_low_message_matches_cli_output() {
        let err = PerfizError::VersionTooLow {
            current: "20.9.8".to_string(),
            required: "20.10.0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Current version is 20.9.8. Min version required: 20.10.0"
        );
    }

    #[test]
    fn configuration_error_names_the_field() {
        let err = PerfizError::Configuration {
            file: "perfiz.yml".to_string(),
            field: "karateFeaturesDir",
            value: "features".to_string(),
            resolved: "/project/features".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Configuration error in perfiz.yml. karateFeaturesDir: features."));
        assert!(msg.contains("/project/features is not a directory"));
        assert!(msg.ends_with("karateFeaturesDir has to be relative to perfiz.yml location."));
    }

    #[test]
    fn external_process_describes_exit() {
        let err = PerfizError::ExternalProcess {
            command: "docker run".to_string(),
            code: Some(3),
        };
        assert_eq!(err.to_string(), "docker run exited with status 3");

        let err = PerfizError::ExternalProcess {
            command: "docker run".to_string(),
            code: None,
        };
        assert_eq!(err.to_string(), "docker run was terminated by a signal");
    }

    #[test]
    fn io_error_keeps_source() {
        let err = PerfizError::io(
            "read perfiz.yml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "read perfiz.yml: gone");
        assert!(std::error::Error::source(&err).is_some());
    }
}
