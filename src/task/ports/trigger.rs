//! Automation trigger port.
//!
//! A trigger tells an external executor to start an automated task. Dispatch
//! is fire-once from the caller's point of view: the outcome of the work is
//! never observed here.

use crate::task::domain::{CompanyId, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;

/// Result type for automation trigger operations.
pub type AutomationTriggerResult<T> = Result<T, AutomationTriggerError>;

/// Signal payload sent to the automated-task executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationRequest {
    /// Task to start.
    pub task_id: TaskId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Deterministic key for the `(task, status)` transition.
    pub dedup_key: String,
}

impl AutomationRequest {
    /// Builds the signal for a task that just became actionable.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id(),
            company_id: task.company_id(),
            dedup_key: dedup_key(task.id(), task.status()),
        }
    }
}

/// Returns the hex SHA-256 of `"{task_id}:{status}"`.
#[must_use]
pub fn dedup_key(task_id: TaskId, status: TaskStatus) -> String {
    let digest = Sha256::digest(format!("{task_id}:{}", status.as_str()).as_bytes());
    hex::encode(digest)
}

/// Dispatch contract for automated-task executors.
#[async_trait]
pub trait AutomationTrigger: Send + Sync + 'static {
    /// Sends one start signal.
    async fn dispatch(&self, request: &AutomationRequest) -> AutomationTriggerResult<()>;
}

/// Errors returned by automation trigger adapters.
#[derive(Debug, Clone, Error)]
pub enum AutomationTriggerError {
    /// The executor answered but refused the signal.
    #[error("automation executor rejected task {task_id} with status {status}")]
    Rejected {
        /// Task the signal was for.
        task_id: TaskId,
        /// Status code returned by the executor.
        status: u16,
    },

    /// The signal could not be delivered.
    #[error("automation transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl AutomationTriggerError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
