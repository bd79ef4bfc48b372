// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for actparse

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "actparse")]
#[command(about = "Parse and inspect GitHub Actions style workflow files")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a workflow file and report anything that was ignored
    Validate {
        #[arg(help = "Path to workflow YAML file")]
        workflow: PathBuf,

        #[arg(long, help = "Fail when any diagnostic is reported")]
        strict: bool,
    },

    /// List the jobs of a workflow in declaration order
    List {
        #[arg(help = "Path to workflow YAML file")]
        workflow: PathBuf,
    },

    /// Render the parsed workflow model. Nothing is executed: secrets are
    /// checked for KEY=VALUE syntax and reported by name only.
    Show {
        #[arg(help = "Path to workflow YAML file")]
        workflow: PathBuf,

        #[arg(short, long, help = "Only show this job")]
        job: Option<String>,

        #[arg(short, long, help = "Output format (json, yaml, text)")]
        format: Option<String>,

        #[arg(short, long, help = "Write output to this file instead of stdout")]
        output: Option<PathBuf>,

        #[arg(
            long,
            help = "Print to stdout instead of writing --output (no effect without --output)"
        )]
        dry_run: bool,

        #[arg(
            short = 's',
            long = "secret",
            help = "Secret (KEY=VALUE); validated and logged by name only, never applied"
        )]
        secrets: Vec<String>,

        #[arg(
            long,
            help = "File with one KEY=VALUE secret per line; validated and logged by name only"
        )]
        secret_file: Option<PathBuf>,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse secrets from key=value format
    pub fn parse_secrets(secrets: &[String]) -> anyhow::Result<HashMap<String, String>> {
        let mut parsed = HashMap::new();

        for secret in secrets {
            if let Some((key, value)) = secret.split_once('=') {
                parsed.insert(key.trim().to_string(), value.to_string());
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid secret format '{}'. Expected 'key=value'",
                    secret
                ));
            }
        }

        Ok(parsed)
    }

    /// Read a secret file. Blank lines and `#` comments are skipped.
    pub fn load_secret_file(path: &Path) -> anyhow::Result<HashMap<String, String>> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read secret file '{}': {}", path.display(), e)
        })?;

        let lines: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        Self::parse_secrets(&lines)
    }
}
