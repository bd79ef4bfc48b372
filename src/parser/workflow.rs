// ABOUTME: Workflow model and the top-level assembler
// ABOUTME: Checks the mandatory root keys, then delegates `on` and `jobs`

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tokio::fs;
use tracing::debug;

use super::diagnostics::{Diagnostic, Diagnostics};
use super::error::{ParserError, Result};
use super::job::{resolve_jobs, Job};
use super::shape::{as_mapping, narrow_or_report, string_key, string_map_field};
use super::step::Step;
use super::trigger::{resolve_triggers, Triggers};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workflow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<Triggers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<IndexMap<String, String>>,
    pub jobs: IndexMap<String, Job>,
}

/// A resolved workflow together with everything that was ignored on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport {
    pub workflow: Workflow,
    pub diagnostics: Vec<Diagnostic>,
}

impl Workflow {
    /// Parse workflow from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ParserError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse workflow from YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(content).map_err(ParserError::YamlError)?;
        Self::from_value(&document, &mut Diagnostics::new())
    }

    /// Assemble a workflow from an already decoded document.
    pub fn from_value(document: &Value, diagnostics: &mut Diagnostics) -> Result<Self> {
        // A root that is not a mapping cannot carry `on`.
        let empty = Mapping::new();
        let root = as_mapping(document).unwrap_or(&empty);

        let on = root
            .get("on")
            .ok_or_else(|| ParserError::missing_property("on"))?;
        let jobs = root
            .get("jobs")
            .ok_or_else(|| ParserError::missing_property("jobs"))?;

        let mut workflow = Workflow {
            name: None,
            on: None,
            env: None,
            jobs: IndexMap::new(),
        };

        for (key, value) in root {
            let Some(key) = string_key(key, "", diagnostics) else {
                continue;
            };
            match key.as_str() {
                "name" => workflow.name = narrow_or_report(value, "name", diagnostics),
                "env" => workflow.env = string_map_field(value, "env", diagnostics),
                "on" | "jobs" => {}
                _ => diagnostics.unsupported_key("", &key),
            }
        }

        workflow.on = resolve_triggers(on, diagnostics);
        workflow.jobs = resolve_jobs(jobs, diagnostics);

        debug!(
            "Resolved workflow {:?} with {} job(s)",
            workflow.name,
            workflow.jobs.len()
        );
        Ok(workflow)
    }

    /// Get all job IDs in declaration order
    pub fn job_ids(&self) -> Vec<String> {
        self.jobs.keys().cloned().collect()
    }

    pub fn get_job(&self, job_id: &str) -> Option<&Job> {
        self.jobs.get(job_id)
    }

    pub fn has_job(&self, job_id: &str) -> bool {
        self.jobs.contains_key(job_id)
    }

    /// Jobs that list `job_id` in their `needs`
    pub fn get_dependent_jobs(&self, job_id: &str) -> Vec<String> {
        self.jobs
            .iter()
            .filter_map(|(id, job)| {
                if job.needs().iter().any(|need| need == job_id) {
                    Some(id.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Environment seen by a step: workflow, then job, then step values, later
    /// ones overriding earlier ones.
    pub fn effective_env(&self, job: &Job, step: &Step) -> IndexMap<String, String> {
        let mut env = IndexMap::new();
        for layer in [&self.env, &job.env, &step.env].into_iter().flatten() {
            env.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        env
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowParser;

impl WorkflowParser {
    pub fn new() -> Self {
        Self
    }

    pub async fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Workflow> {
        Ok(self.parse_file_report(path).await?.workflow)
    }

    pub async fn parse_file_report<P: AsRef<Path>>(&self, path: P) -> Result<ParseReport> {
        let content = fs::read_to_string(path.as_ref())
            .await
            .map_err(ParserError::IoError)?;
        self.parse_report(&content)
    }

    pub fn parse_string(&self, content: &str) -> Result<Workflow> {
        Workflow::from_yaml(content)
    }

    pub fn parse_report(&self, content: &str) -> Result<ParseReport> {
        let document: Value = serde_yaml::from_str(content).map_err(ParserError::YamlError)?;
        let mut diagnostics = Diagnostics::new();
        let workflow = Workflow::from_value(&document, &mut diagnostics)?;
        Ok(ParseReport {
            workflow,
            diagnostics: diagnostics.into_vec(),
        })
    }
}

impl Default for WorkflowParser {
    fn default() -> Self {
        Self::new()
    }
}
