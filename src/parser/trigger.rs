// ABOUTME: Trigger model and the resolver for the root `on` property
// ABOUTME: Handles the bare-name, name-list and per-event mapping forms

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::diagnostics::{child_path, index_path, DiagnosticKind, Diagnostics};
use super::shape::{as_mapping, as_sequence, shape_name, string_key, string_list_field, try_narrow};

/// Trigger kinds with a dedicated event parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Push,
    PullRequest,
}

impl TriggerKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "push" => Some(TriggerKind::Push),
            "pull_request" => Some(TriggerKind::PullRequest),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Push => "push",
            TriggerKind::PullRequest => "pull_request",
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three accepted forms of `on`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Triggers {
    /// `on: push`
    Event(String),
    /// `on: [push, pull_request]`
    Events(Vec<String>),
    /// `on: { push: {...}, pull_request: {...} }`
    EventMap(IndexMap<String, TriggerEvent>),
}

impl Triggers {
    /// Trigger names in declaration order, whatever the form.
    pub fn event_names(&self) -> Vec<&str> {
        match self {
            Triggers::Event(name) => vec![name.as_str()],
            Triggers::Events(names) => names.iter().map(String::as_str).collect(),
            Triggers::EventMap(events) => events.keys().map(String::as_str).collect(),
        }
    }

    pub fn event(&self, name: &str) -> Option<&TriggerEvent> {
        match self {
            Triggers::EventMap(events) => events.get(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TriggerEvent {
    Push(PushTriggerEvent),
    PullRequest(PullRequestTriggerEvent),
}

impl TriggerEvent {
    pub fn kind(&self) -> TriggerKind {
        match self {
            TriggerEvent::Push(_) => TriggerKind::Push,
            TriggerEvent::PullRequest(_) => TriggerKind::PullRequest,
        }
    }

    pub fn filters(&self) -> &EventFilters {
        match self {
            TriggerEvent::Push(event) => &event.filters,
            TriggerEvent::PullRequest(event) => &event.filters,
        }
    }
}

/// Glob filters shared by push and pull request events. `None` means the
/// filter was not declared, which is not the same as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches_ignore: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags_ignore: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths_ignore: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PushTriggerEvent {
    #[serde(flatten)]
    pub filters: EventFilters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PullRequestTriggerEvent {
    #[serde(flatten)]
    pub filters: EventFilters,
    /// Activity types, e.g. `opened`, `synchronize`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
}

/// Resolve the node bound to `on`. `None` when it names no supported trigger.
pub fn resolve_triggers(node: &Value, diagnostics: &mut Diagnostics) -> Option<Triggers> {
    const PATH: &str = "on";

    if let Some(map) = as_mapping(node) {
        let mut events = IndexMap::new();
        for (key, body) in map {
            let Some(name) = string_key(key, PATH, diagnostics) else {
                continue;
            };

            match TriggerKind::from_name(&name) {
                Some(kind) => {
                    let path = child_path(PATH, &name);
                    let event = parse_event(kind, body, &path, diagnostics);
                    events.insert(name, event);
                }
                None => report_unsupported(&child_path(PATH, &name), &name, diagnostics),
            }
        }
        return Some(Triggers::EventMap(events));
    }

    if let Some(items) = as_sequence(node) {
        let mut names: Vec<String> = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let path = index_path(PATH, index);
            match try_narrow::<String>(item) {
                Some(name) if TriggerKind::from_name(&name).is_none() => {
                    report_unsupported(&path, &name, diagnostics)
                }
                Some(name) if names.contains(&name) => diagnostics.report(
                    path,
                    DiagnosticKind::DroppedEntry { found: "duplicate" },
                ),
                Some(name) => names.push(name),
                None => diagnostics.report(
                    path,
                    DiagnosticKind::DroppedEntry {
                        found: shape_name(item),
                    },
                ),
            }
        }
        return Some(Triggers::Events(names));
    }

    match try_narrow::<String>(node) {
        Some(name) if TriggerKind::from_name(&name).is_some() => Some(Triggers::Event(name)),
        Some(name) => {
            report_unsupported(PATH, &name, diagnostics);
            None
        }
        None => {
            diagnostics.unexpected_shape(PATH, "string, sequence or mapping", shape_name(node));
            None
        }
    }
}

fn report_unsupported(path: &str, name: &str, diagnostics: &mut Diagnostics) {
    diagnostics.report(
        path,
        DiagnosticKind::UnsupportedTrigger {
            name: name.to_string(),
        },
    );
}

fn parse_event(
    kind: TriggerKind,
    body: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> TriggerEvent {
    match kind {
        TriggerKind::Push => TriggerEvent::Push(parse_push_event(body, path, diagnostics)),
        TriggerKind::PullRequest => {
            TriggerEvent::PullRequest(parse_pull_request_event(body, path, diagnostics))
        }
    }
}

/// Event body as a mapping; null means "enabled with defaults".
fn event_body<'a>(
    body: &'a Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<&'a Mapping> {
    if body.is_null() {
        return None;
    }
    let map = as_mapping(body);
    if map.is_none() {
        diagnostics.unexpected_shape(path, "mapping", shape_name(body));
    }
    map
}

/// Assign a filter when `key` is one of the six glob filters. Returns false
/// for any other key.
fn apply_filter(
    filters: &mut EventFilters,
    key: &str,
    value: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> bool {
    let slot = match key {
        "branches" => &mut filters.branches,
        "branches-ignore" => &mut filters.branches_ignore,
        "tags" => &mut filters.tags,
        "tags-ignore" => &mut filters.tags_ignore,
        "paths" => &mut filters.paths,
        "paths-ignore" => &mut filters.paths_ignore,
        _ => return false,
    };
    *slot = string_list_field(value, &child_path(path, key), diagnostics);
    true
}

pub fn parse_push_event(
    body: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> PushTriggerEvent {
    let mut event = PushTriggerEvent::default();
    let Some(map) = event_body(body, path, diagnostics) else {
        return event;
    };

    for (key, value) in map {
        let Some(key) = string_key(key, path, diagnostics) else {
            continue;
        };
        if !apply_filter(&mut event.filters, &key, value, path, diagnostics) {
            diagnostics.unsupported_key(path, &key);
        }
    }

    event
}

pub fn parse_pull_request_event(
    body: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> PullRequestTriggerEvent {
    let mut event = PullRequestTriggerEvent::default();
    let Some(map) = event_body(body, path, diagnostics) else {
        return event;
    };

    for (key, value) in map {
        let Some(key) = string_key(key, path, diagnostics) else {
            continue;
        };
        if apply_filter(&mut event.filters, &key, value, path, diagnostics) {
            continue;
        }
        if key == "types" {
            event.types = activity_types(value, &child_path(path, "types"), diagnostics);
        } else {
            diagnostics.unsupported_key(path, &key);
        }
    }

    event
}

/// `types` accepts a list of strings or a single bare string.
fn activity_types(
    value: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<String>> {
    if let Some(single) = try_narrow::<String>(value) {
        return Some(vec![single]);
    }
    string_list_field(value, path, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> (Option<Triggers>, Diagnostics) {
        let node: Value = serde_yaml::from_str(text).unwrap();
        let mut diagnostics = Diagnostics::new();
        let triggers = resolve_triggers(&node, &mut diagnostics);
        (triggers, diagnostics)
    }

    #[test]
    fn test_bare_supported_name() {
        let (triggers, diagnostics) = resolve("push");
        assert_eq!(triggers, Some(Triggers::Event("push".to_string())));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_bare_unsupported_name_is_unset() {
        let (triggers, diagnostics) = resolve("issues");
        assert_eq!(triggers, None);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_sequence_filters_unsupported_and_duplicates() {
        let (triggers, diagnostics) = resolve("[push, issues, pull_request, push, 3]");
        assert_eq!(
            triggers,
            Some(Triggers::Events(vec![
                "push".to_string(),
                "pull_request".to_string()
            ]))
        );
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_empty_sequence_still_picks_sequence_form() {
        let (triggers, _) = resolve("[issues]");
        assert_eq!(triggers, Some(Triggers::Events(Vec::new())));
    }

    #[test]
    fn test_mapping_keeps_declaration_order() {
        let (triggers, _) = resolve(
            r#"
pull_request:
push:
  branches: [main]
issues:
"#,
        );
        let triggers = triggers.unwrap();
        assert_eq!(triggers.event_names(), vec!["pull_request", "push"]);

        match triggers.event("push") {
            Some(TriggerEvent::Push(push)) => {
                assert_eq!(push.filters.branches, Some(vec!["main".to_string()]));
                assert_eq!(push.filters.tags, None);
            }
            other => panic!("expected push event, got {:?}", other),
        }
        assert_eq!(
            triggers.event("pull_request"),
            Some(&TriggerEvent::PullRequest(PullRequestTriggerEvent::default()))
        );
    }

    #[test]
    fn test_all_push_filters() {
        let (triggers, diagnostics) = resolve(
            r#"
push:
  branches: [main, master]
  branches-ignore: [test/*]
  tags: [v*.*.*]
  tags-ignore: [v*.*.*-beta.*]
  paths: [src/**/*.rs]
  paths-ignore: [build/*, dist/*]
"#,
        );
        assert!(diagnostics.is_empty());
        let filters = triggers.unwrap().event("push").unwrap().filters().clone();
        assert_eq!(filters.branches.unwrap(), vec!["main", "master"]);
        assert_eq!(filters.branches_ignore.unwrap(), vec!["test/*"]);
        assert_eq!(filters.tags.unwrap(), vec!["v*.*.*"]);
        assert_eq!(filters.tags_ignore.unwrap(), vec!["v*.*.*-beta.*"]);
        assert_eq!(filters.paths.unwrap(), vec!["src/**/*.rs"]);
        assert_eq!(filters.paths_ignore.unwrap(), vec!["build/*", "dist/*"]);
    }

    #[test]
    fn test_filter_with_wrong_shape_stays_unset() {
        let (triggers, diagnostics) = resolve("push: { branches: main, tags: [] }");
        let filters = triggers.unwrap().event("push").unwrap().filters().clone();
        assert_eq!(filters.branches, None);
        assert_eq!(filters.tags, Some(Vec::new()));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_pull_request_types_forms() {
        let (triggers, _) = resolve("pull_request: { types: review_requested }");
        match triggers.unwrap().event("pull_request") {
            Some(TriggerEvent::PullRequest(pr)) => {
                assert_eq!(pr.types, Some(vec!["review_requested".to_string()]))
            }
            other => panic!("expected pull_request event, got {:?}", other),
        }

        let (triggers, _) = resolve("pull_request: { types: [opened, synchronize] }");
        match triggers.unwrap().event("pull_request") {
            Some(TriggerEvent::PullRequest(pr)) => {
                assert_eq!(
                    pr.types,
                    Some(vec!["opened".to_string(), "synchronize".to_string()])
                )
            }
            other => panic!("expected pull_request event, got {:?}", other),
        }

        let (triggers, _) = resolve("pull_request: { types: { opened: true } }");
        match triggers.unwrap().event("pull_request") {
            Some(TriggerEvent::PullRequest(pr)) => assert_eq!(pr.types, None),
            other => panic!("expected pull_request event, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_key_is_reported() {
        let (_, diagnostics) = resolve("push: { branches: [main], unknown: 1 }");
        let entries = diagnostics.into_vec();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "on.push.unknown");
    }

    #[test]
    fn test_scalar_shape_other_than_string_is_unset() {
        let (triggers, diagnostics) = resolve("42");
        assert_eq!(triggers, None);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_non_string_event_key_is_reported() {
        let (triggers, diagnostics) = resolve("push: { branches: [main], 1: x }");
        match triggers.unwrap().event("push") {
            Some(TriggerEvent::Push(push)) => {
                assert_eq!(push.filters.branches, Some(vec!["main".to_string()]))
            }
            other => panic!("expected push event, got {:?}", other),
        }
        let entries = diagnostics.into_vec();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "on.push");
        assert_eq!(entries[0].kind, DiagnosticKind::DroppedEntry { found: "number" });
    }
}
