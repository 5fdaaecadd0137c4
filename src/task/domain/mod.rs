//! Domain model for renewal workflow tasks.
//!
//! The task domain models task identity, the status state machine, template
//! instantiation, and dependency evaluation while keeping persistence and
//! automation dispatch outside of the domain boundary.

mod error;
mod ids;
mod resolution;
mod status;
mod task;
mod template;

pub use error::{ParseTaskKindError, ParseTaskStatusError, TaskDomainError};
pub use ids::{CompanyId, DependencyRef, TaskId, TemplateId};
pub use resolution::{Readiness, ScopeEvaluation, TaskIndex, evaluate_scope, find_unblocked};
pub use status::{TaskKind, TaskStatus, fold_token};
pub use task::{PersistedTaskData, Task, TaskDraft};
pub use template::{TaskTemplate, instantiate_workflow};
