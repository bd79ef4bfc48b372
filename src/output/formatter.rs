// ABOUTME: Output formatters for a resolved workflow (JSON, YAML, text)
// ABOUTME: Renders either the whole workflow or a single selected job

use indexmap::IndexMap;
use serde::Serialize;

use super::error::Result;
use crate::parser::{Job, Workflow};

pub trait OutputFormatter: Send + Sync {
    fn format_workflow(&self, workflow: &Workflow) -> Result<String>;

    fn format_job(&self, job_id: &str, job: &Job) -> Result<String>;
}

/// `{ job_id: job }`, rendered without an intermediate value tree.
fn single_job<'a>(job_id: &'a str, job: &'a Job) -> IndexMap<&'a str, &'a Job> {
    IndexMap::from([(job_id, job)])
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct YamlFormatter;

pub struct TextFormatter;

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(rendered)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_workflow(&self, workflow: &Workflow) -> Result<String> {
        self.render(workflow)
    }

    fn format_job(&self, job_id: &str, job: &Job) -> Result<String> {
        self.render(&single_job(job_id, job))
    }
}

impl Default for YamlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for YamlFormatter {
    fn format_workflow(&self, workflow: &Workflow) -> Result<String> {
        Ok(serde_yaml::to_string(workflow)?)
    }

    fn format_job(&self, job_id: &str, job: &Job) -> Result<String> {
        Ok(serde_yaml::to_string(&single_job(job_id, job))?)
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    fn push_job(output: &mut String, job_id: &str, job: &Job) {
        output.push_str(&format!("Job: {}", job_id));
        if let Some(name) = &job.name {
            output.push_str(&format!(" ({})", name));
        }
        output.push('\n');

        if let Some(runs_on) = &job.runs_on {
            output.push_str(&format!("  Runs on: {}\n", runs_on));
        }
        if !job.needs().is_empty() {
            output.push_str(&format!("  Needs: {}\n", job.needs().join(", ")));
        }
        if let Some(condition) = &job.if_condition {
            output.push_str(&format!("  If: {}\n", condition));
        }
        output.push_str(&format!("  Timeout: {} min\n", job.timeout_minutes));
        if job.continue_on_error {
            output.push_str("  Continue on error: yes\n");
        }
        if let Some(env) = &job.env {
            output.push_str(&format!("  Env: {} variable(s)\n", env.len()));
        }

        output.push_str(&format!("  Steps ({}):\n", job.steps.len()));
        for (index, step) in job.steps.iter().enumerate() {
            output.push_str(&format!("    {}. {}\n", index + 1, step.name));
            if let Some(uses) = &step.uses {
                output.push_str(&format!("       uses: {}\n", uses));
            }
            if let Some(run) = &step.run {
                for line in run.lines() {
                    output.push_str(&format!("       | {}\n", line));
                }
            }
            if let Some(shell) = step.shell {
                output.push_str(&format!("       shell: {}\n", shell));
            }
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_workflow(&self, workflow: &Workflow) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "Workflow: {}\n",
            workflow.name.as_deref().unwrap_or("(unnamed)")
        ));

        let triggers = workflow
            .on
            .as_ref()
            .map(|on| on.event_names().join(", "))
            .unwrap_or_else(|| "(none)".to_string());
        output.push_str(&format!("Triggers: {}\n", triggers));

        if let Some(env) = &workflow.env {
            output.push_str(&format!("Env: {} variable(s)\n", env.len()));
        }

        for (job_id, job) in &workflow.jobs {
            output.push('\n');
            Self::push_job(&mut output, job_id, job);
        }

        Ok(output)
    }

    fn format_job(&self, job_id: &str, job: &Job) -> Result<String> {
        let mut output = String::new();
        Self::push_job(&mut output, job_id, job);
        Ok(output)
    }
}
