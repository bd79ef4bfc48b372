// ABOUTME: Job model and the resolver for the root `jobs` mapping
// ABOUTME: Keeps declaration order and delegates each step to the step resolver

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

use super::diagnostics::{child_path, index_path, Diagnostics};
use super::shape::{
    as_sequence, mapping_or_report, narrow_or_report, sequence_or_report, shape_name, string_key,
    string_list, string_list_field, string_map_field, try_narrow,
};
use super::step::{resolve_minutes, resolve_step, Step};

pub const DEFAULT_TIMEOUT_MINUTES: u32 = 360;

/// Runner target: one label or a label set, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RunsOn {
    Label(String),
    Labels(Vec<String>),
}

impl RunsOn {
    pub fn labels(&self) -> Vec<&str> {
        match self {
            RunsOn::Label(label) => vec![label.as_str()],
            RunsOn::Labels(labels) => labels.iter().map(String::as_str).collect(),
        }
    }
}

impl std::fmt::Display for RunsOn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.labels().join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs_on: Option<RunsOn>,
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub if_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<IndexMap<String, String>>,
    pub steps: Vec<Step>,
    pub timeout_minutes: u32,
    pub continue_on_error: bool,
}

impl Default for Job {
    fn default() -> Self {
        Self {
            name: None,
            needs: None,
            runs_on: None,
            if_condition: None,
            env: None,
            steps: Vec::new(),
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            continue_on_error: false,
        }
    }
}

impl Job {
    pub fn needs(&self) -> &[String] {
        self.needs.as_deref().unwrap_or_default()
    }

    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(key)
    }
}

/// Resolve the node bound to `jobs`. A node that is not a mapping yields no
/// jobs.
pub fn resolve_jobs(node: &Value, diagnostics: &mut Diagnostics) -> IndexMap<String, Job> {
    const PATH: &str = "jobs";

    let mut jobs = IndexMap::new();
    let Some(map) = mapping_or_report(node, PATH, diagnostics) else {
        return jobs;
    };

    for (key, value) in map {
        let Some(job_id) = string_key(key, PATH, diagnostics) else {
            continue;
        };

        let path = child_path(PATH, &job_id);
        let job = resolve_job(value, &path, diagnostics);
        jobs.insert(job_id, job);
    }

    jobs
}

pub fn resolve_job(node: &Value, path: &str, diagnostics: &mut Diagnostics) -> Job {
    let mut job = Job::default();
    let Some(map) = mapping_or_report(node, path, diagnostics) else {
        return job;
    };

    for (key, value) in map {
        let Some(key) = string_key(key, path, diagnostics) else {
            continue;
        };
        let field_path = child_path(path, &key);

        match key.as_str() {
            "name" => job.name = narrow_or_report(value, &field_path, diagnostics),
            "needs" => job.needs = resolve_needs(value, &field_path, diagnostics),
            "runs-on" => job.runs_on = resolve_runs_on(value, &field_path, diagnostics),
            "if" => job.if_condition = narrow_or_report(value, &field_path, diagnostics),
            "env" => job.env = string_map_field(value, &field_path, diagnostics),
            "steps" => job.steps = resolve_steps(value, &field_path, diagnostics),
            "timeout-minutes" => {
                if let Some(minutes) = resolve_minutes(value, &field_path, diagnostics) {
                    job.timeout_minutes = minutes;
                }
            }
            "continue-on-error" => {
                if let Some(flag) = narrow_or_report::<bool>(value, &field_path, diagnostics) {
                    job.continue_on_error = flag;
                }
            }
            _ => diagnostics.unsupported_key(path, &key),
        }
    }

    job
}

/// `needs` is a list of job ids; a single id is accepted as a one-element list.
fn resolve_needs(
    value: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<String>> {
    if let Some(single) = try_narrow::<String>(value) {
        return Some(vec![single]);
    }
    string_list_field(value, path, diagnostics)
}

fn resolve_runs_on(value: &Value, path: &str, diagnostics: &mut Diagnostics) -> Option<RunsOn> {
    if let Some(label) = try_narrow::<String>(value) {
        return Some(RunsOn::Label(label));
    }
    if let Some(items) = as_sequence(value) {
        return Some(RunsOn::Labels(string_list(items, path, diagnostics)));
    }
    diagnostics.unexpected_shape(path, "string or sequence", shape_name(value));
    None
}

fn resolve_steps(value: &Value, path: &str, diagnostics: &mut Diagnostics) -> Vec<Step> {
    let Some(items) = sequence_or_report(value, path, diagnostics) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| resolve_step(item, &index_path(path, index), diagnostics))
        .collect()
}
