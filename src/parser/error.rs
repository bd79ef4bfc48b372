// ABOUTME: Error types for workflow parsing
// ABOUTME: Structural failures carry the name of the missing root property

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to read workflow file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("{message}")]
    MissingProperty { property: String, message: String },
}

impl ParserError {
    pub fn missing_property(property: &str) -> Self {
        ParserError::MissingProperty {
            property: property.to_string(),
            message: format!("Workflow is missing required property '{}'", property),
        }
    }

    /// Name of the offending root property, for structural failures only.
    pub fn property_name(&self) -> Option<&str> {
        match self {
            ParserError::MissingProperty { property, .. } => Some(property),
            _ => None,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, ParserError::MissingProperty { .. })
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;
