// ABOUTME: Parser module for GitHub Actions style workflow definitions
// ABOUTME: Exports the resolvers, the typed workflow model and parse diagnostics

pub mod diagnostics;
pub mod error;
pub mod job;
pub mod shape;
pub mod step;
pub mod trigger;
pub mod workflow;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::ParserError;
pub use job::{Job, RunsOn, DEFAULT_TIMEOUT_MINUTES};
pub use shape::{try_narrow, Shape};
pub use step::{Shell, Step};
pub use trigger::{
    EventFilters, PullRequestTriggerEvent, PushTriggerEvent, TriggerEvent, TriggerKind, Triggers,
};
pub use workflow::{ParseReport, Workflow, WorkflowParser};
