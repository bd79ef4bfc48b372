// ABOUTME: Non-failing shape narrowing over the decoded YAML tree
// ABOUTME: Every resolver asks this module whether a node has the shape it wants

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use super::diagnostics::{child_path, index_path, DiagnosticKind, Diagnostics};

/// A shape a decoded node can be narrowed into.
///
/// Scalars require the exact decoded kind: an integer node does not satisfy
/// `String`, a float does not satisfy `i64`. Containers are narrowed by
/// reference through [`as_mapping`] and [`as_sequence`].
pub trait Shape: Sized {
    const NAME: &'static str;

    fn narrow(node: &Value) -> Option<Self>;
}

pub fn try_narrow<S: Shape>(node: &Value) -> Option<S> {
    S::narrow(untag(node))
}

/// Name of the node's shape, as used in diagnostics.
pub fn shape_name(node: &Value) -> &'static str {
    match untag(node) {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

fn untag(mut node: &Value) -> &Value {
    while let Value::Tagged(tagged) = node {
        node = &tagged.value;
    }
    node
}

impl Shape for String {
    const NAME: &'static str = "string";

    fn narrow(node: &Value) -> Option<Self> {
        match node {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl Shape for bool {
    const NAME: &'static str = "bool";

    fn narrow(node: &Value) -> Option<Self> {
        match node {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Shape for i64 {
    const NAME: &'static str = "integer";

    fn narrow(node: &Value) -> Option<Self> {
        match node {
            Value::Number(n) if n.is_i64() => n.as_i64(),
            _ => None,
        }
    }
}

impl Shape for u64 {
    const NAME: &'static str = "unsigned integer";

    fn narrow(node: &Value) -> Option<Self> {
        match node {
            Value::Number(n) if n.is_u64() => n.as_u64(),
            _ => None,
        }
    }
}

impl Shape for f64 {
    const NAME: &'static str = "float";

    fn narrow(node: &Value) -> Option<Self> {
        match node {
            Value::Number(n) if n.is_f64() => n.as_f64(),
            _ => None,
        }
    }
}

/// Borrowing narrow for mappings. Only the outer kind is checked; element
/// filtering is left to the caller.
pub fn as_mapping(node: &Value) -> Option<&Mapping> {
    match untag(node) {
        Value::Mapping(map) => Some(map),
        _ => None,
    }
}

/// Borrowing narrow for sequences.
pub fn as_sequence(node: &Value) -> Option<&[Value]> {
    match untag(node) {
        Value::Sequence(seq) => Some(seq.as_slice()),
        _ => None,
    }
}

pub fn mapping_or_report<'a>(
    node: &'a Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<&'a Mapping> {
    let map = as_mapping(node);
    if map.is_none() {
        diagnostics.unexpected_shape(path, "mapping", shape_name(node));
    }
    map
}

pub fn sequence_or_report<'a>(
    node: &'a Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<&'a [Value]> {
    let items = as_sequence(node);
    if items.is_none() {
        diagnostics.unexpected_shape(path, "sequence", shape_name(node));
    }
    items
}

/// Key of a mapping entry under `path`. Non-string keys drop the entry.
pub fn string_key(key: &Value, path: &str, diagnostics: &mut Diagnostics) -> Option<String> {
    let key_text = try_narrow::<String>(key);
    if key_text.is_none() {
        diagnostics.report(
            path,
            DiagnosticKind::DroppedEntry {
                found: shape_name(key),
            },
        );
    }
    key_text
}

/// Narrow to `S`, reporting a shape diagnostic at `path` on mismatch.
pub fn narrow_or_report<S: Shape>(
    node: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<S> {
    let narrowed = try_narrow::<S>(node);
    if narrowed.is_none() {
        diagnostics.unexpected_shape(path, S::NAME, shape_name(node));
    }
    narrowed
}

/// String elements of a sequence in source order; other elements are dropped.
pub fn string_list(items: &[Value], path: &str, diagnostics: &mut Diagnostics) -> Vec<String> {
    let mut strings = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match try_narrow::<String>(item) {
            Some(s) => strings.push(s),
            None => diagnostics.report(
                index_path(path, index),
                DiagnosticKind::DroppedEntry {
                    found: shape_name(item),
                },
            ),
        }
    }
    strings
}

/// Sequence-of-strings field: `None` when the node is not a sequence.
pub fn string_list_field(
    node: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<String>> {
    let items = sequence_or_report(node, path, diagnostics)?;
    Some(string_list(items, path, diagnostics))
}

/// Textual form of a scalar, as used for `env` and `with` values.
pub fn scalar_text(node: &Value) -> Option<String> {
    match untag(node) {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Mapping filtered to string keys with scalar values, in source order.
pub fn string_map(
    map: &Mapping,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> IndexMap<String, String> {
    let mut result = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        let Some(key) = string_key(key, path, diagnostics) else {
            continue;
        };

        match scalar_text(value) {
            Some(text) => {
                result.insert(key, text);
            }
            None => diagnostics.report(
                child_path(path, &key),
                DiagnosticKind::DroppedEntry {
                    found: shape_name(value),
                },
            ),
        }
    }
    result
}

/// Mapping-of-strings field: `None` when the node is not a mapping.
pub fn string_map_field(
    node: &Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<IndexMap<String, String>> {
    let map = mapping_or_report(node, path, diagnostics)?;
    Some(string_map(map, path, diagnostics))
}
