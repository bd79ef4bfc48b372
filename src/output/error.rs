// ABOUTME: Error types for output handling operations
// ABOUTME: Covers rendering a resolved workflow and writing it to a destination

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Formatter not found: {format}")]
    FormatterNotFound { format: String },

    #[error("Unknown output format '{format}'. Expected one of: json, yaml, text")]
    UnknownFormat { format: String },

    #[error("Writer not found: {writer_type}")]
    WriterNotFound { writer_type: String },

    #[error("Job '{job}' not found in workflow")]
    JobNotFound { job: String },

    #[error("Write error: {message}")]
    WriteError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlSerializationError(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;
