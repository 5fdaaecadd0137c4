//! Shared world state for dependency resolution BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use renewal_desk::task::{
    adapters::memory::{InMemoryTaskRepository, RecordingAutomationTrigger},
    domain::{CompanyId, PersistedTaskData, Task, TaskId, TaskKind, TaskStatus},
    ports::TaskRepository,
    services::TaskWorkflowService,
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestWorkflowService =
    TaskWorkflowService<InMemoryTaskRepository, RecordingAutomationTrigger, DefaultClock>;

/// Scenario world for dependency resolution behaviour tests.
pub struct ResolutionWorld {
    pub repository: Arc<InMemoryTaskRepository>,
    pub trigger: Arc<RecordingAutomationTrigger>,
    pub service: TestWorkflowService,
    pub company_id: CompanyId,
    pub other_company_id: CompanyId,
    pub pending: Vec<(String, PersistedTaskData)>,
    pub ids: HashMap<String, TaskId>,
    pub stored: bool,
}

impl ResolutionWorld {
    /// Creates a world with no tasks.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let trigger = Arc::new(RecordingAutomationTrigger::new());
        let service = TaskWorkflowService::new(
            Arc::clone(&repository),
            Arc::clone(&trigger),
            Arc::new(DefaultClock),
        );
        Self {
            repository,
            trigger,
            service,
            company_id: CompanyId::new(),
            other_company_id: CompanyId::new(),
            pending: Vec::new(),
            ids: HashMap::new(),
            stored: false,
        }
    }

    /// Queues a task for storage under `label`.
    pub fn add_task(&mut self, label: String, kind: TaskKind, status: TaskStatus) {
        let now = Utc::now();
        let id = TaskId::new();
        self.ids.insert(label.clone(), id);
        self.pending.push((
            label.clone(),
            PersistedTaskData {
                id,
                company_id: self.company_id,
                template_id: None,
                title: format!("Task {label}"),
                kind,
                status,
                dependencies: Vec::new(),
                created_at: now,
                updated_at: now,
            },
        ));
    }

    /// Returns the queued data for `label`.
    ///
    /// # Errors
    ///
    /// Returns an error when no task was declared under `label`.
    pub fn pending_mut(&mut self, label: &str) -> Result<&mut PersistedTaskData, eyre::Report> {
        self.pending
            .iter_mut()
            .find(|(pending_label, _)| pending_label == label)
            .map(|(_, data)| data)
            .ok_or_else(|| eyre::eyre!("no task declared as {label}"))
    }

    /// Returns the task id declared under `label`.
    ///
    /// # Errors
    ///
    /// Returns an error when no task was declared under `label`.
    pub fn id_of(&self, label: &str) -> Result<TaskId, eyre::Report> {
        self.ids
            .get(label)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task declared as {label}"))
    }

    /// Stores every queued task once, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error when the repository rejects the batch.
    pub fn persist_pending(&mut self) -> Result<(), eyre::Report> {
        if self.stored {
            return Ok(());
        }
        let tasks: Vec<Task> = self
            .pending
            .iter()
            .map(|(_, data)| Task::from_persisted(data.clone()))
            .collect();
        run_async(self.repository.store_all(&tasks))?;
        self.stored = true;
        Ok(())
    }
}

impl Default for ResolutionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ResolutionWorld {
    ResolutionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
