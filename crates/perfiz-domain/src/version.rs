//! `<tool> --version` parsing.
//!
//! Tools print their versions in a handful of shapes:
//!
//! ```text
//! Docker version 20.10.8, build 3967b7d
//! docker-compose version 1.29.2, build 5becea4c
//! Docker Compose version v2.0.0-rc.2
//! ```
//!
//! Only major and minor take part in the comparison.

use perfiz_error::PerfizError;
use perfiz_types::ToolRequirement;
use regex::Regex;
use std::sync::LazyLock;

static COMMAND_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.* version ").expect("command prefix regex"));
static BUILD_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r", .*").expect("build suffix regex"));
static PRE_RELEASE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-.*").expect("pre-release suffix regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion {
    pub major: u32,
    pub minor: u32,

    /// Version text without the command name and build metadata,
    /// e.g. `20.9.8` or `v2.0.0-rc.2`.
    pub display: String,
}

impl ToolVersion {
    pub fn satisfies(&self, req: &ToolRequirement) -> bool {
        if self.major > req.min_major {
            return true;
        }
        self.major == req.min_major && self.minor >= req.min_minor
    }
}

pub fn parse_version(output: &str) -> Result<ToolVersion, PerfizError> {
    let first_line = output.lines().next().unwrap_or_default().trim();

    let without_command = COMMAND_PREFIX.replace(first_line, "");
    let display = BUILD_SUFFIX
        .replace(&without_command.replace("Docker version ", ""), "")
        .trim()
        .to_string();
    let numeric = PRE_RELEASE_SUFFIX
        .replace(&display.replace('v', ""), "")
        .into_owned();

    let unparseable = || PerfizError::UnparseableVersion {
        output: output.trim().to_string(),
    };

    let mut components = numeric.split('.');
    let major = components
        .next()
        .and_then(|c| c.trim().parse::<u32>().ok())
        .ok_or_else(unparseable)?;
    let minor = components
        .next()
        .and_then(|c| c.trim().parse::<u32>().ok())
        .ok_or_else(unparseable)?;

    Ok(ToolVersion {
        major,
        minor,
        display,
    })
}

/// Parse `output` and require it to meet `req`.
pub fn check_version(output: &str, req: &ToolRequirement) -> Result<ToolVersion, PerfizError> {
    let version = parse_version(output)?;
    if version.satisfies(req) {
        Ok(version)
    } else {
        Err(PerfizError::VersionTooLow {
            current: version.display,
            required: req.display_min(),
        })
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Any well-formed docker version line parses back to its numbers.
        #[test]
        fn docker_lines_parse(major in 0u32..100, minor in 0u32..100, patch in 0u32..100, build in "[0-9a-f]{7}") {
            let line = format!("Docker version {major}.{minor}.{patch}, build {build}");
            let v = parse_version(&line).unwrap();
            prop_assert_eq!((v.major, v.minor), (major, minor));
            prop_assert_eq!(v.display, format!("{major}.{minor}.{patch}"));
        }

        /// The comparison is lexicographic on (major, minor).
        #[test]
        fn satisfies_is_lexicographic(major in 0u32..50, minor in 0u32..50, req_major in 0u32..50, req_minor in 0u32..50) {
            let v = ToolVersion { major, minor, display: String::new() };
            let req = ToolRequirement { name: "tool", min_major: req_major, min_minor: req_minor };
            prop_assert_eq!(v.satisfies(&req), (major, minor) >= (req_major, req_minor));
        }

        /// Parsing never panics on arbitrary input.
        #[test]
        fn parse_never_panics(s in "\\PC*") {
            let _ = parse_version(&s);
        }
    }
}
