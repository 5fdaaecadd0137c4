//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use renewal_desk::task::{
    adapters::memory::{InMemoryTaskRepository, RecordingAutomationTrigger},
    domain::{Task, TaskId, TaskStatus},
    services::TaskWorkflowService,
};
use rstest::fixture;

/// Workflow service wired to in-memory adapters.
pub type TestService =
    TaskWorkflowService<InMemoryTaskRepository, RecordingAutomationTrigger, DefaultClock>;

/// Service and the adapters behind it.
pub struct Stack {
    pub repository: Arc<InMemoryTaskRepository>,
    pub trigger: Arc<RecordingAutomationTrigger>,
    pub service: TestService,
}

/// Fixture that builds a fresh in-memory stack.
#[fixture]
pub fn stack() -> Stack {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let trigger = Arc::new(RecordingAutomationTrigger::new());
    let service = TaskWorkflowService::new(
        Arc::clone(&repository),
        Arc::clone(&trigger),
        Arc::new(DefaultClock),
    );
    Stack {
        repository,
        trigger,
        service,
    }
}

/// Returns the stored status of `id` among `tasks`.
///
/// # Errors
///
/// Returns an error when `id` is not in `tasks`.
pub fn status_in(tasks: &[Task], id: TaskId) -> Result<TaskStatus, eyre::Report> {
    tasks
        .iter()
        .find(|task| task.id() == id)
        .map(Task::status)
        .ok_or_else(|| eyre::eyre!("task {id} not listed"))
}
