//! Service layer for renewal workflow creation and task status updates.

use super::{ResolutionReport, TaskStatusResolver};
use crate::task::{
    domain::{
        CompanyId, ParseTaskStatusError, Task, TaskDomainError, TaskId, TaskStatus, TaskTemplate,
        instantiate_workflow,
    },
    ports::{AutomationTrigger, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Attempts made before a contended status update is reported.
const STATUS_UPDATE_ATTEMPTS: usize = 3;

/// Request payload for creating a company's renewal workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeWorkflowRequest {
    company_id: CompanyId,
    company_name: String,
    templates: Vec<TaskTemplate>,
}

impl InitializeWorkflowRequest {
    /// Creates a request with no templates.
    #[must_use]
    pub fn new(company_id: CompanyId, company_name: impl Into<String>) -> Self {
        Self {
            company_id,
            company_name: company_name.into(),
            templates: Vec::new(),
        }
    }

    /// Sets the workflow templates, in display order.
    #[must_use]
    pub fn with_templates(mut self, templates: impl IntoIterator<Item = TaskTemplate>) -> Self {
        self.templates = templates.into_iter().collect();
        self
    }
}

/// Request payload for a human status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    task_id: TaskId,
    status: String,
}

impl UpdateTaskStatusRequest {
    /// Creates a request; `status` may use any known spelling.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>) -> Self {
        Self {
            task_id,
            status: status.into(),
        }
    }
}

/// Tasks created for a new workflow.
#[derive(Debug, Clone)]
pub struct InitializedWorkflow {
    /// Created tasks, in template order.
    pub tasks: Vec<Task>,
    /// Tasks created actionable and the automation signals sent for them.
    pub report: ResolutionReport,
}

/// Result of a status update.
#[derive(Debug, Clone)]
pub struct StatusUpdateOutcome {
    /// Task after the update.
    pub task: Task,
    /// Dependents unblocked, when the update completed the task.
    pub report: Option<ResolutionReport>,
}

/// Service-level errors for workflow operations.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The requested status is not a known spelling.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The task kept changing underneath the update.
    #[error("task {0} was modified concurrently; retry the update")]
    ConcurrentUpdate(TaskId),
}

/// Result type for workflow service operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;

/// Renewal workflow orchestration service.
pub struct TaskWorkflowService<R, T, C>
where
    R: TaskRepository,
    T: AutomationTrigger,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    resolver: TaskStatusResolver<R, T, C>,
}

impl<R, T, C> TaskWorkflowService<R, T, C>
where
    R: TaskRepository,
    T: AutomationTrigger,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service and its resolver.
    #[must_use]
    pub fn new(repository: Arc<R>, trigger: Arc<T>, clock: Arc<C>) -> Self {
        let resolver =
            TaskStatusResolver::new(Arc::clone(&repository), trigger, Arc::clone(&clock));
        Self {
            repository,
            clock,
            resolver,
        }
    }

    /// Returns the resolver shared with this service.
    #[must_use]
    pub const fn resolver(&self) -> &TaskStatusResolver<R, T, C> {
        &self.resolver
    }

    /// Creates the tasks of a renewal workflow from templates.
    ///
    /// Tasks without dependencies start actionable; automated ones are
    /// signalled immediately.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Domain`] for malformed templates and
    /// [`TaskWorkflowError::Repository`] when the batch cannot be stored.
    #[instrument(skip(self, request), fields(company_id = %request.company_id))]
    pub async fn initialize_workflow(
        &self,
        request: InitializeWorkflowRequest,
    ) -> TaskWorkflowResult<InitializedWorkflow> {
        let tasks = instantiate_workflow(
            request.company_id,
            &request.company_name,
            &request.templates,
            &*self.clock,
        )?;
        self.repository.store_all(&tasks).await?;
        info!(task_count = tasks.len(), "renewal workflow created");

        let report = self.resolver.announce_created(&tasks).await;
        Ok(InitializedWorkflow { tasks, report })
    }

    /// Applies a status change and, on completion, resolves dependents.
    ///
    /// Repeating the current status leaves the task untouched; repeating a
    /// completion still runs the resolver, which is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::InvalidStatus`] for unknown statuses,
    /// [`TaskWorkflowError::NotFound`] for missing tasks,
    /// [`TaskWorkflowError::Domain`] for backward transitions, and repository
    /// errors. Resolver problems never surface here.
    #[instrument(skip(self, request), fields(task_id = %request.task_id))]
    pub async fn update_status(
        &self,
        request: UpdateTaskStatusRequest,
    ) -> TaskWorkflowResult<StatusUpdateOutcome> {
        let target = TaskStatus::try_from(request.status.as_str())?;
        let task = self.apply_status(request.task_id, target).await?;

        let report = if target == TaskStatus::Completed {
            Some(self.resolver.resolve_dependents(task.id()).await)
        } else {
            None
        };
        Ok(StatusUpdateOutcome { task, report })
    }

    /// Lists a company's tasks in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Repository`] when the lookup fails.
    pub async fn list_company_tasks(&self, company_id: CompanyId) -> TaskWorkflowResult<Vec<Task>> {
        Ok(self.repository.list_by_company(company_id).await?)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Repository`] when the lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> TaskWorkflowResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    async fn apply_status(&self, task_id: TaskId, target: TaskStatus) -> TaskWorkflowResult<Task> {
        for _ in 0..STATUS_UPDATE_ATTEMPTS {
            let mut task = self
                .repository
                .find_by_id(task_id)
                .await?
                .ok_or(TaskWorkflowError::NotFound(task_id))?;
            let current = task.status();
            if current == target {
                debug!(status = %target, "status unchanged");
                return Ok(task);
            }
            task.transition_to(target, &*self.clock)?;

            let written = self
                .repository
                .compare_and_set_status(task_id, current, target, task.updated_at())
                .await?;
            if let Some(updated) = written {
                info!(from = %current, to = %target, "task status updated");
                return Ok(updated);
            }
            debug!("task changed during update; retrying");
        }
        Err(TaskWorkflowError::ConcurrentUpdate(task_id))
    }
}
