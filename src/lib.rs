// ABOUTME: Main library module for the actparse workflow parser
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod output;
pub mod parser;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use output::{OutputFormat, OutputHandler};
pub use parser::{
    Diagnostic, Job, ParseReport, ParserError, Step, Triggers, Workflow, WorkflowParser,
};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
