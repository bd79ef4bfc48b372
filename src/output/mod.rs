// ABOUTME: Output handling for resolved workflows
// ABOUTME: Picks a formatter by output format and a writer by destination

pub mod error;
pub mod formatter;
pub mod writer;

use std::collections::HashMap;
use std::str::FromStr;

use self::error::{OutputError, Result};
use self::formatter::{JsonFormatter, OutputFormatter, TextFormatter, YamlFormatter};
use self::writer::{FileWriter, OutputDestination, OutputWriter, StdoutWriter};
use crate::parser::Workflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(OutputError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub struct OutputHandler {
    formatters: HashMap<String, Box<dyn OutputFormatter>>,
    writers: HashMap<String, Box<dyn OutputWriter>>,
}

impl OutputHandler {
    pub fn new() -> Self {
        let mut handler = Self {
            formatters: HashMap::new(),
            writers: HashMap::new(),
        };

        handler.register_formatter("json", Box::new(JsonFormatter::new_pretty()));
        handler.register_formatter("yaml", Box::new(YamlFormatter::new()));
        handler.register_formatter("text", Box::new(TextFormatter::new()));

        handler.register_writer("stdout", Box::new(StdoutWriter::new()));
        handler.register_writer("file", Box::new(FileWriter::new()));

        handler
    }

    pub fn register_formatter(&mut self, name: &str, formatter: Box<dyn OutputFormatter>) {
        self.formatters.insert(name.to_string(), formatter);
    }

    pub fn register_writer(&mut self, name: &str, writer: Box<dyn OutputWriter>) {
        self.writers.insert(name.to_string(), writer);
    }

    fn formatter(&self, format: OutputFormat) -> Result<&dyn OutputFormatter> {
        self.formatters
            .get(format.as_str())
            .map(|f| f.as_ref())
            .ok_or_else(|| OutputError::FormatterNotFound {
                format: format.to_string(),
            })
    }

    /// Render the whole workflow, or only `job_id` when one is given.
    pub fn render(
        &self,
        workflow: &Workflow,
        job_id: Option<&str>,
        format: OutputFormat,
    ) -> Result<String> {
        let formatter = self.formatter(format)?;
        match job_id {
            Some(id) => {
                let job = workflow
                    .get_job(id)
                    .ok_or_else(|| OutputError::JobNotFound { job: id.to_string() })?;
                formatter.format_job(id, job)
            }
            None => formatter.format_workflow(workflow),
        }
    }

    pub async fn write(&self, content: &str, destination: &OutputDestination) -> Result<()> {
        let writer_type = destination.writer_type();
        let writer = self
            .writers
            .get(writer_type)
            .ok_or_else(|| OutputError::WriterNotFound {
                writer_type: writer_type.to_string(),
            })?;
        writer.write(content, destination).await
    }

    pub async fn output_workflow(
        &self,
        workflow: &Workflow,
        job_id: Option<&str>,
        format: OutputFormat,
        destination: &OutputDestination,
    ) -> Result<()> {
        let rendered = self.render(workflow, job_id, format)?;
        self.write(&rendered, destination).await
    }

    pub fn list_formatters(&self) -> Vec<&str> {
        self.formatters.keys().map(|k| k.as_str()).collect()
    }

    pub fn list_writers(&self) -> Vec<&str> {
        self.writers.keys().map(|k| k.as_str()).collect()
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
