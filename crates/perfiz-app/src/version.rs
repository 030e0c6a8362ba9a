//! `perfiz version`.

use crate::environment::{perfiz_version, require_home};
use perfiz_adapters::EnvSource;

#[derive(Debug, Clone)]
pub struct VersionRequest {
    pub cli_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Contents of `$PERFIZ_HOME/.VERSION`; empty when unreadable.
    pub perfiz: String,
    pub cli: String,
}

pub struct VersionUseCase<E: EnvSource> {
    env: E,
}

impl<E: EnvSource> VersionUseCase<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    pub fn execute(&self, req: VersionRequest) -> anyhow::Result<VersionInfo> {
        let perfiz_home = require_home(&self.env)?;
        Ok(VersionInfo {
            perfiz: perfiz_version(&perfiz_home),
            cli: req.cli_version,
        })
    }
}

pub fn render_banner(info: &VersionInfo) -> String {
    let mut out = String::new();
    out.push_str("********** PERFIZ VERSION **********\n");
    out.push_str(&format!("perfiz {}\n", info.perfiz));
    out.push_str(&format!("perfiz-cli {}\n", info.cli));
    out.push_str("************************************\n");
    out
}
