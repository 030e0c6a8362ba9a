//! Perfiz workspace-level test utilities.
//!
//! This crate exists solely to support workspace-level integration tests,
//! particularly the BDD/cucumber tests in `tests/cucumber.rs`.
//!
//! The actual perfiz functionality is in the workspace member crates:
//! - `perfiz-types`: Config record and fixed paths
//! - `perfiz-domain`: Pure logic (version parsing, argv building)
//! - `perfiz-adapters`: Process, PATH and filesystem adapters
//! - `perfiz-config`: YAML config loading and validation
//! - `perfiz-app`: One use case per subcommand
//! - `perfiz-cli`: CLI interface
