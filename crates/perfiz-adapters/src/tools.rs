use std::path::PathBuf;

/// Finds executables on the search path.
pub trait ToolLocator {
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

#[derive(Debug, Default, Clone)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// Read access to the process environment.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Default, Clone)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}
