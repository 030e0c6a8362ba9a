use anyhow::Context;
use clap::{Parser, Subcommand};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_SCHEMA: &str = "perfiz.config.v1.schema.json";

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Repo automation for perfiz")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// (Re)generate the JSON Schema for perfiz.yml.
    Schema {
        /// Output directory
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },

    /// Check perfiz config files (globs allowed) against the schema.
    CheckConfigs {
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Run the "usual" repo checks (fmt, clippy, test, schema).
    Ci,

    /// Run mutation testing via cargo-mutants (must be installed).
    Mutants {
        /// Extra args forwarded to cargo-mutants
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Schema { out_dir } => cmd_schema(&out_dir),
        Command::CheckConfigs { patterns } => cmd_check_configs(&patterns),
        Command::Ci => cmd_ci(),
        Command::Mutants { args } => cmd_mutants(args),
    }
}

fn cmd_ci() -> anyhow::Result<()> {
    run("cargo", ["fmt", "--all", "--", "--check"])?;
    run(
        "cargo",
        ["clippy", "--all-targets", "--all-features", "--", "-D", "warnings"],
    )?;
    run("cargo", ["test", "--all"])?;
    run("cargo", ["run", "-p", "xtask", "--", "schema"])?;
    Ok(())
}

fn cmd_mutants(args: Vec<String>) -> anyhow::Result<()> {
    let status = std::process::Command::new("cargo")
        .arg("mutants")
        .args(args)
        .status()
        .context("running cargo mutants")?;
    if !status.success() {
        anyhow::bail!("cargo mutants failed: {status}");
    }
    Ok(())
}

fn run<const N: usize>(bin: &str, args: [&str; N]) -> anyhow::Result<()> {
    let status = std::process::Command::new(bin)
        .args(args)
        .status()
        .with_context(|| format!("running {bin}"))?;
    if !status.success() {
        anyhow::bail!("{bin} failed: {status}");
    }
    Ok(())
}

fn config_schema() -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(schema_for!(perfiz_types::PerfizConfig))?)
}

fn cmd_schema(out_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("create dir {}", out_dir.display()))?;

    let path = out_dir.join(CONFIG_SCHEMA);
    let json = serde_json::to_vec_pretty(&config_schema()?)?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn cmd_check_configs(patterns: &[String]) -> anyhow::Result<()> {
    let schema = config_schema()?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("invalid config schema: {e}"))?;

    let mut files = Vec::new();
    for pattern in patterns {
        for entry in glob::glob(pattern).with_context(|| format!("bad pattern {pattern}"))? {
            files.push(entry?);
        }
    }
    if files.is_empty() {
        anyhow::bail!("no config files matched {patterns:?}");
    }

    let mut failures = 0usize;
    for file in &files {
        let text =
            fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
        let instance: serde_json::Value = serde_yaml::from_str(&text)
            .with_context(|| format!("parse {}", file.display()))?;

        let errors: Vec<String> = validator
            .iter_errors(&instance)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            println!("ok   {}", file.display());
        } else {
            failures += 1;
            println!("FAIL {}", file.display());
            for error in errors {
                println!("     {error}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} config files failed validation", files.len());
    }
    Ok(())
}
