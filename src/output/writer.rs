// ABOUTME: Output writers for rendered workflows (stdout, files)
// ABOUTME: Each writer handles one kind of OutputDestination

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

use super::error::{OutputError, Result};

/// Where rendered output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File { path: PathBuf, create_dirs: bool },
}

impl OutputDestination {
    pub fn writer_type(&self) -> &'static str {
        match self {
            OutputDestination::Stdout => "stdout",
            OutputDestination::File { .. } => "file",
        }
    }
}

#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn write(&self, content: &str, destination: &OutputDestination) -> Result<()>;
}

pub struct StdoutWriter;

pub struct FileWriter;

impl Default for StdoutWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputWriter for StdoutWriter {
    async fn write(&self, content: &str, _destination: &OutputDestination) -> Result<()> {
        if content.ends_with('\n') {
            print!("{}", content);
        } else {
            println!("{}", content);
        }
        debug!("Output written to stdout ({} chars)", content.len());
        Ok(())
    }
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputWriter for FileWriter {
    async fn write(&self, content: &str, destination: &OutputDestination) -> Result<()> {
        let OutputDestination::File { path, create_dirs } = destination else {
            return Err(OutputError::WriteError {
                message: format!(
                    "File writer cannot write to {} destination",
                    destination.writer_type()
                ),
            });
        };

        if *create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| OutputError::WriteError {
                        message: format!("Failed to create directory {}: {}", parent.display(), e),
                    })?;
            }
        }

        fs::write(path, content)
            .await
            .map_err(|e| OutputError::WriteError {
                message: format!("Failed to write file {}: {}", path.display(), e),
            })?;

        info!(
            "Output written to file: {} ({} bytes)",
            path.display(),
            content.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_writer_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("ci.json");
        let destination = OutputDestination::File {
            path: path.clone(),
            create_dirs: true,
        };

        FileWriter::new()
            .write("{\"name\":\"ci\"}", &destination)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\"name\":\"ci\"}");
    }

    #[tokio::test]
    async fn test_file_writer_rejects_stdout_destination() {
        let result = FileWriter::new()
            .write("content", &OutputDestination::Stdout)
            .await;
        assert!(matches!(result, Err(OutputError::WriteError { .. })));
    }

    #[tokio::test]
    async fn test_file_writer_without_create_dirs_fails_on_missing_parent() {
        let temp_dir = TempDir::new().unwrap();
        let destination = OutputDestination::File {
            path: temp_dir.path().join("missing").join("out.yaml"),
            create_dirs: false,
        };
        let result = FileWriter::new().write("jobs: {}", &destination).await;
        assert!(result.is_err());
    }
}
