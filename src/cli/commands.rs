// ABOUTME: Command implementations for the actparse CLI
// ABOUTME: Handles execution of the validate, list, and show commands

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::config::Config;
use crate::output::writer::OutputDestination;
use crate::output::{OutputFormat, OutputHandler};
use crate::parser::{ParseReport, Workflow, WorkflowParser};

async fn load_report(workflow_path: &Path) -> Result<ParseReport> {
    WorkflowParser::new()
        .parse_file_report(workflow_path)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse workflow '{}': {}",
                workflow_path.display(),
                e
            )
        })
}

fn workflow_title(workflow: &Workflow) -> &str {
    workflow.name.as_deref().unwrap_or("(unnamed)")
}

/// Validate a workflow file
pub async fn validate_workflow(
    workflow_path: PathBuf,
    strict: bool,
    _config: &Config,
) -> Result<()> {
    info!("Validating workflow: {}", workflow_path.display());

    let report = load_report(&workflow_path).await?;
    let workflow = &report.workflow;

    let triggers = workflow
        .on
        .as_ref()
        .map(|on| on.event_names().join(", "))
        .unwrap_or_else(|| "(none)".to_string());

    println!("✓ Workflow '{}' parsed", workflow_title(workflow));
    println!("  Triggers: {}", triggers);
    println!("  Jobs: {}", workflow.jobs.len());
    println!(
        "  Steps: {}",
        workflow.jobs.values().map(|job| job.steps.len()).sum::<usize>()
    );

    if !report.diagnostics.is_empty() {
        println!("  Diagnostics ({}):", report.diagnostics.len());
        for diagnostic in &report.diagnostics {
            println!("    - {}", diagnostic);
        }
    }

    if strict && !report.diagnostics.is_empty() {
        return Err(anyhow::anyhow!(
            "Workflow validation failed: {} diagnostic(s) reported in strict mode",
            report.diagnostics.len()
        ));
    }

    info!("Workflow validation completed successfully");
    Ok(())
}

/// List jobs in declaration order
pub async fn list_jobs(workflow_path: PathBuf, _config: &Config) -> Result<()> {
    let report = load_report(&workflow_path).await?;
    let workflow = &report.workflow;

    println!("Workflow '{}'", workflow_title(workflow));
    for (job_id, job) in &workflow.jobs {
        let runner = job
            .runs_on
            .as_ref()
            .map(|runs_on| runs_on.to_string())
            .unwrap_or_else(|| "-".to_string());
        let needs = if job.needs().is_empty() {
            "-".to_string()
        } else {
            job.needs().join(", ")
        };

        println!(
            "  {}  {}  runs-on: {}  needs: {}",
            job_id,
            job.display_name(job_id),
            runner,
            needs
        );
    }

    Ok(())
}

/// Render the parsed workflow, or a single job, to stdout or a file
pub async fn show_workflow(
    workflow_path: PathBuf,
    job: Option<String>,
    format: Option<String>,
    output: Option<PathBuf>,
    dry_run: bool,
    secrets: HashMap<String, String>,
    config: &Config,
) -> Result<()> {
    let format: OutputFormat = format
        .as_deref()
        .unwrap_or(&config.default_format)
        .parse()?;

    let report = load_report(&workflow_path).await?;
    for diagnostic in &report.diagnostics {
        warn!("Ignored while parsing: {}", diagnostic);
    }

    if !secrets.is_empty() {
        let mut names: Vec<&str> = secrets.keys().map(String::as_str).collect();
        names.sort_unstable();
        info!("Secrets provided: {}", names.join(", "));
    }

    let handler = OutputHandler::new();
    let rendered = handler.render(&report.workflow, job.as_deref(), format)?;

    let destination = match output {
        Some(path) if dry_run => {
            info!("Dry run - not writing {}", path.display());
            OutputDestination::Stdout
        }
        Some(path) => OutputDestination::File {
            path,
            create_dirs: true,
        },
        None => OutputDestination::Stdout,
    };

    handler.write(&rendered, &destination).await?;
    Ok(())
}
