// ABOUTME: Collected non-fatal findings produced while resolving a workflow
// ABOUTME: Every degrade-to-unset path reports here and is mirrored to tracing

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Key outside the recognized set for its mapping.
    UnsupportedKey { key: String },
    /// Trigger name that has no event parser.
    UnsupportedTrigger { name: String },
    /// Node had a different shape than the field accepts.
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
    /// Right shape, but the value is outside the accepted set.
    InvalidValue { value: String },
    /// Element dropped while filtering a sequence or mapping.
    DroppedEntry { found: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnsupportedKey { key } => {
                write!(f, "{}: unsupported key '{}' ignored", self.path, key)
            }
            DiagnosticKind::UnsupportedTrigger { name } => {
                write!(f, "{}: unsupported trigger '{}' ignored", self.path, name)
            }
            DiagnosticKind::UnexpectedShape { expected, found } => write!(
                f,
                "{}: expected {}, found {}; left unset",
                self.path, expected, found
            ),
            DiagnosticKind::InvalidValue { value } => {
                write!(f, "{}: unrecognized value '{}' left unset", self.path, value)
            }
            DiagnosticKind::DroppedEntry { found } => {
                write!(f, "{}: dropped {} entry", self.path, found)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, path: impl Into<String>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            path: path.into(),
            kind,
        };

        match diagnostic.kind {
            DiagnosticKind::UnsupportedKey { .. } | DiagnosticKind::UnsupportedTrigger { .. } => {
                debug!("{}", diagnostic)
            }
            _ => warn!("{}", diagnostic),
        }

        self.entries.push(diagnostic);
    }

    pub fn unsupported_key(&mut self, path: &str, key: &str) {
        self.report(
            child_path(path, key),
            DiagnosticKind::UnsupportedKey {
                key: key.to_string(),
            },
        );
    }

    pub fn unexpected_shape(
        &mut self,
        path: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) {
        self.report(path, DiagnosticKind::UnexpectedShape { expected, found });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// Dotted path to a mapping member, e.g. `jobs.build` + `runs-on`.
pub fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

pub fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
