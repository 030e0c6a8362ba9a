//! Domain logic for perfiz.
//!
//! This crate is intentionally I/O-free: it parses tool output, builds argv
//! vectors and decides which files take part in a run.

pub mod docker;
pub mod version;

pub use docker::{
    compose_env_file, gatling_run_args, network_inspect_args, ComposeAction, ComposeLauncher,
    GatlingRun,
};
pub use version::{check_version, parse_version, ToolVersion};

use perfiz_types::{PROTECTED_SIMULATION_FRAGMENT, SIMULATION_EXTENSION};
use std::path::Path;

/// True for Gatling simulation sources (`*.scala`).
pub fn is_simulation(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == SIMULATION_EXTENSION)
}

/// A simulation left over from a previous `test` run.
///
/// Simulations bundled with perfiz carry `Perfiz` in their file name and are kept.
pub fn is_stale_simulation(path: &Path) -> bool {
    if !is_simulation(path) {
        return false;
    }
    path.file_name()
        .map(|name| !name.to_string_lossy().contains(PROTECTED_SIMULATION_FRAGMENT))
        .unwrap_or(false)
}

/// Render an argv the way it would be typed in a shell, for logs.
pub fn display_argv(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("{arg:?}")
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `ls -l` style permission string, e.g. `drwxrwxrwx`.
pub fn format_permissions(mode: u32, is_dir: bool) -> String {
    let mut out = String::with_capacity(10);
    out.push(if is_dir { 'd' } else { '-' });
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scala_files_are_simulations() {
        assert!(is_simulation(Path::new("sims/Checkout.scala")));
        assert!(!is_simulation(Path::new("sims/README.md")));
        assert!(!is_simulation(Path::new("sims/scala")));
        assert!(!is_simulation(Path::new("sims/Checkout.scala.bak")));
    }

    #[test]
    fn bundled_simulations_are_not_stale() {
        assert!(!is_stale_simulation(Path::new(
            "src/test/scala/org/znsio/perfiz/PerfizSimulation.scala"
        )));
        assert!(is_stale_simulation(Path::new("src/test/scala/Checkout.scala")));
        assert!(!is_stale_simulation(Path::new("src/test/scala/notes.txt")));
    }

    #[test]
    fn protected_fragment_only_matches_file_name() {
        assert!(is_stale_simulation(Path::new(
            "src/test/scala/Perfiz/Checkout.scala"
        )));
    }

    #[test]
    fn display_argv_quotes_whitespace() {
        let argv = vec![
            "docker".to_string(),
            "run".to_string(),
            "-v".to_string(),
            "/my dir:/x".to_string(),
            String::new(),
        ];
        assert_eq!(display_argv(&argv), r#"docker run -v "/my dir:/x" """#);
    }

    #[test]
    fn permissions_render_like_ls() {
        assert_eq!(format_permissions(0o777, true), "drwxrwxrwx");
        assert_eq!(format_permissions(0o644, false), "-rw-r--r--");
        assert_eq!(format_permissions(0o40750, true), "drwxr-x---");
    }
}
