//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus, TemplateId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The requested status change would move the task backwards or nowhere.
    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidStatusTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested target status.
        to: TaskStatus,
    },

    /// Two templates in one workflow share the same identifier.
    #[error("duplicate template identifier in workflow: {0}")]
    DuplicateTemplate(TemplateId),

    /// A template depends on a template that is not part of the workflow.
    #[error("template {template_id} depends on unknown template {dependency}")]
    UnknownTemplateDependency {
        /// Template declaring the dependency.
        template_id: TemplateId,
        /// Dependency that could not be found.
        dependency: TemplateId,
    },

    /// The template waits on itself, directly or through other templates.
    #[error("template {0} is part of or waits on a dependency cycle")]
    CyclicTemplateDependency(TemplateId),

    /// A task title template failed to render.
    #[error("failed to render title for template {template_id}: {reason}")]
    TemplateRender {
        /// Template whose title failed to render.
        template_id: TemplateId,
        /// Renderer diagnostic.
        reason: String,
    },
}

/// Error returned while parsing task statuses from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task kinds from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task kind: {0}")]
pub struct ParseTaskKindError(pub String);
