// ABOUTME: Step model, the shell enumeration and the per-step resolver
// ABOUTME: Resolves one element of a job's `steps` sequence into a typed Step

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

use super::diagnostics::{child_path, DiagnosticKind, Diagnostics};
use super::shape::{as_mapping, narrow_or_report, shape_name, string_key, string_map_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Bash,
    Pwsh,
    Python,
    Sh,
    Cmd,
    Powershell,
}

impl Shell {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bash" => Some(Shell::Bash),
            "pwsh" => Some(Shell::Pwsh),
            "python" => Some(Shell::Python),
            "sh" => Some(Shell::Sh),
            "cmd" => Some(Shell::Cmd),
            "powershell" => Some(Shell::Powershell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Pwsh => "pwsh",
            Shell::Python => "python",
            Shell::Sh => "sh",
            Shell::Cmd => "cmd",
            Shell::Powershell => "powershell",
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Step {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Raw `if:` expression, never evaluated here.
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub if_condition: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<Shell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<u32>,
}

impl Step {
    pub fn is_action(&self) -> bool {
        self.uses.is_some()
    }

    /// Display name used when `name` is not declared: the action reference,
    /// then the first command line, then the id.
    fn derived_name(&self) -> String {
        if let Some(uses) = &self.uses {
            return format!("Run {}", uses);
        }
        if let Some(line) = self
            .run
            .as_deref()
            .and_then(|run| run.lines().map(str::trim).find(|line| !line.is_empty()))
        {
            return format!("Run {}", line);
        }
        self.id.clone().unwrap_or_default()
    }
}

/// Resolve one element of `steps`. Never fails; a non-mapping element yields
/// an empty step.
pub fn resolve_step(node: &Value, path: &str, diagnostics: &mut Diagnostics) -> Step {
    let mut step = Step::default();
    let Some(map) = as_mapping(node) else {
        diagnostics.unexpected_shape(path, "mapping", shape_name(node));
        return step;
    };

    let mut declared_name = None;
    for (key, value) in map {
        let Some(key) = string_key(key, path, diagnostics) else {
            continue;
        };
        let field_path = child_path(path, &key);

        match key.as_str() {
            "name" => declared_name = narrow_or_report::<String>(value, &field_path, diagnostics),
            "id" => step.id = narrow_or_report(value, &field_path, diagnostics),
            "if" => step.if_condition = narrow_or_report(value, &field_path, diagnostics),
            "uses" => step.uses = narrow_or_report(value, &field_path, diagnostics),
            "run" => step.run = narrow_or_report(value, &field_path, diagnostics),
            "working-directory" => {
                step.working_directory = narrow_or_report(value, &field_path, diagnostics)
            }
            "shell" => step.shell = resolve_shell(value, &field_path, diagnostics),
            "with" => step.with = string_map_field(value, &field_path, diagnostics),
            "env" => step.env = string_map_field(value, &field_path, diagnostics),
            "timeout-minutes" => {
                step.timeout_minutes = resolve_minutes(value, &field_path, diagnostics)
            }
            _ => diagnostics.unsupported_key(path, &key),
        }
    }

    step.name = match declared_name {
        Some(name) => name,
        None => step.derived_name(),
    };
    step
}

fn resolve_shell(value: &Value, path: &str, diagnostics: &mut Diagnostics) -> Option<Shell> {
    let name = narrow_or_report::<String>(value, path, diagnostics)?;
    let shell = Shell::from_name(&name);
    if shell.is_none() {
        diagnostics.report(path, DiagnosticKind::InvalidValue { value: name });
    }
    shell
}

/// Minute counts are non-negative integers that fit in `u32`.
pub(crate) fn resolve_minutes(
    value: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<u32> {
    let minutes = narrow_or_report::<i64>(value, path, diagnostics)?;
    match u32::try_from(minutes) {
        Ok(minutes) => Some(minutes),
        Err(_) => {
            diagnostics.report(
                path,
                DiagnosticKind::InvalidValue {
                    value: minutes.to_string(),
                },
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (Step, Diagnostics) {
        let node: Value = serde_yaml::from_str(text).unwrap();
        let mut diagnostics = Diagnostics::new();
        let step = resolve_step(&node, "jobs.build.steps[0]", &mut diagnostics);
        (step, diagnostics)
    }

    #[test]
    fn test_action_step() {
        let (step, diagnostics) = parse(
            r#"
name: checkout
id: checkout
uses: actions/checkout@v4
with:
  fetch-depth: 1
  submodules: true
"#,
        );
        assert!(diagnostics.is_empty());
        assert_eq!(step.name, "checkout");
        assert_eq!(step.id.as_deref(), Some("checkout"));
        assert!(step.is_action());
        let with = step.with.unwrap();
        assert_eq!(with.get("fetch-depth").map(String::as_str), Some("1"));
        assert_eq!(with.get("submodules").map(String::as_str), Some("true"));
        assert_eq!(step.env, None);
    }

    #[test]
    fn test_run_step_keeps_newlines() {
        let (step, _) = parse(
            r#"
name: build
shell: bash
working-directory: crates/core
env:
  RUST_LOG: debug
run: |
  cargo build
  cargo test
"#,
        );
        assert_eq!(step.run.as_deref(), Some("cargo build\ncargo test\n"));
        assert_eq!(step.shell, Some(Shell::Bash));
        assert_eq!(step.working_directory.as_deref(), Some("crates/core"));
        assert_eq!(step.env.unwrap().get("RUST_LOG").unwrap(), "debug");
    }

    #[test]
    fn test_unknown_shell_is_unset() {
        let (step, diagnostics) = parse("{ run: echo hi, shell: unknown-shell }");
        assert_eq!(step.shell, None);
        let entries = diagnostics.into_vec();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "jobs.build.steps[0].shell");
    }

    #[test]
    fn test_every_shell_name() {
        for name in ["bash", "pwsh", "python", "sh", "cmd", "powershell"] {
            let shell = Shell::from_name(name).unwrap();
            assert_eq!(shell.as_str(), name);
        }
        assert_eq!(Shell::from_name("Bash"), None);
    }

    #[test]
    fn test_if_and_timeout() {
        let (step, diagnostics) = parse(
            "{ run: make, if: \"${{ github.event_name == 'push' }}\", timeout-minutes: 15 }",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(
            step.if_condition.as_deref(),
            Some("${{ github.event_name == 'push' }}")
        );
        assert_eq!(step.timeout_minutes, Some(15));
    }

    #[test]
    fn test_negative_timeout_is_unset() {
        let (step, diagnostics) = parse("{ run: make, timeout-minutes: -5 }");
        assert_eq!(step.timeout_minutes, None);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_unsupported_key_does_not_abort() {
        let (step, diagnostics) =
            parse("{ name: lint, continue-on-error: true, run: cargo clippy }");
        assert_eq!(step.name, "lint");
        assert_eq!(step.run.as_deref(), Some("cargo clippy"));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_non_string_key_is_reported() {
        let (step, diagnostics) = parse("{ run: make, true: yes }");
        assert_eq!(step.run.as_deref(), Some("make"));
        let entries = diagnostics.into_vec();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "jobs.build.steps[0]");
        assert_eq!(entries[0].kind, DiagnosticKind::DroppedEntry { found: "bool" });
    }

    #[test]
    fn test_non_mapping_step_is_empty() {
        let (step, diagnostics) = parse("just a string");
        assert_eq!(step, Step::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_name_fallbacks() {
        let (step, _) = parse("{ uses: actions/setup-node@v4 }");
        assert_eq!(step.name, "Run actions/setup-node@v4");

        let (step, _) = parse("{ run: \"\\n  npm ci\\n  npm test\\n\" }");
        assert_eq!(step.name, "Run npm ci");

        let (step, _) = parse("{ id: only-id }");
        assert_eq!(step.name, "only-id");

        let (step, _) = parse("{ shell: bash }");
        assert_eq!(step.name, "");
    }

    #[test]
    fn test_non_string_name_falls_back() {
        let (step, diagnostics) = parse("{ name: 42, uses: actions/cache@v4 }");
        assert_eq!(step.name, "Run actions/cache@v4");
        assert_eq!(diagnostics.len(), 1);
    }
}
