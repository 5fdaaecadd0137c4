//! Dependency resolution and status propagation after a task completes.

use crate::task::{
    domain::{CompanyId, DependencyRef, Task, TaskId, TaskKind, TaskStatus, evaluate_scope},
    ports::{AutomationRequest, AutomationTrigger, TaskRepository, TaskRepositoryError},
};
use dashmap::DashMap;
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Problem met while resolving dependents.
///
/// None of these abort a resolution run; each is logged and recorded in the
/// [`ResolutionReport`].
#[derive(Debug, Clone, Error)]
pub enum ResolutionIssue {
    /// The completed task does not exist.
    #[error("completed task {0} not found")]
    TaskNotFound(TaskId),

    /// A dependency reference matches no task in the company scope.
    #[error("task {task_id} depends on unknown reference {reference}")]
    DependencyUnresolved {
        /// Blocked task.
        task_id: TaskId,
        /// Reference that matched nothing.
        reference: DependencyRef,
    },

    /// Reading the completed task or its scope failed.
    #[error("failed to read tasks: {0}")]
    StoreReadFailure(TaskRepositoryError),

    /// Writing a transition failed; the task was skipped.
    #[error("failed to transition task {task_id}: {error}")]
    StoreWriteFailure {
        /// Task whose transition was abandoned.
        task_id: TaskId,
        /// Underlying repository error.
        error: TaskRepositoryError,
    },
}

/// Outcome of one resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    transitioned: Vec<TaskId>,
    triggered: Vec<TaskId>,
    issues: Vec<ResolutionIssue>,
}

impl ResolutionReport {
    /// Tasks moved to `needs_attention` by this run, in scope order.
    #[must_use]
    pub fn transitioned(&self) -> &[TaskId] {
        &self.transitioned
    }

    /// Automated tasks whose start signal was queued.
    ///
    /// Delivery happens in the background; its outcome is only logged.
    #[must_use]
    pub fn triggered(&self) -> &[TaskId] {
        &self.triggered
    }

    /// Problems recorded during the run.
    #[must_use]
    pub fn issues(&self) -> &[ResolutionIssue] {
        &self.issues
    }
}

/// Moves `upcoming` tasks to `needs_attention` once their dependencies are
/// satisfied, and starts automated ones.
///
/// Runs are serialized per company, and every transition is a store-level
/// compare-and-set from `upcoming`, so a task is transitioned and signalled at
/// most once however often or concurrently the resolver is invoked. Start
/// signals are sent on spawned tasks once the company lock is released, so a
/// slow executor never holds up a run.
pub struct TaskStatusResolver<R, T, C>
where
    R: TaskRepository,
    T: AutomationTrigger,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    trigger: Arc<T>,
    clock: Arc<C>,
    scope_locks: Arc<DashMap<CompanyId, Arc<Mutex<()>>>>,
}

impl<R, T, C> Clone for TaskStatusResolver<R, T, C>
where
    R: TaskRepository,
    T: AutomationTrigger,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            trigger: Arc::clone(&self.trigger),
            clock: Arc::clone(&self.clock),
            scope_locks: Arc::clone(&self.scope_locks),
        }
    }
}

impl<R, T, C> TaskStatusResolver<R, T, C>
where
    R: TaskRepository,
    T: AutomationTrigger,
    C: Clock + Send + Sync,
{
    /// Creates a resolver.
    #[must_use]
    pub fn new(repository: Arc<R>, trigger: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            repository,
            trigger,
            clock,
            scope_locks: Arc::new(DashMap::new()),
        }
    }

    /// Transitions the dependents unblocked by `completed_task_id`.
    ///
    /// The caller persists the completion first. A missing task yields an
    /// empty report.
    #[instrument(skip(self))]
    pub async fn resolve_dependents(&self, completed_task_id: TaskId) -> ResolutionReport {
        let mut report = ResolutionReport::default();
        let completed = match self.repository.find_by_id(completed_task_id).await {
            Ok(Some(task)) => task,
            Ok(None) => {
                warn!("completed task not found; nothing to resolve");
                report
                    .issues
                    .push(ResolutionIssue::TaskNotFound(completed_task_id));
                return report;
            }
            Err(err) => {
                error!(error = %err, "failed to load completed task");
                report.issues.push(ResolutionIssue::StoreReadFailure(err));
                return report;
            }
        };
        if completed.status() != TaskStatus::Completed {
            debug!(status = %completed.status(), "resolving dependents of a task that is not completed");
        }

        self.resolve_scope(completed.company_id(), report).await
    }

    /// Re-evaluates a whole company without a completion event.
    ///
    /// Picks up zero-dependency tasks and completions whose event was lost.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, company_id: CompanyId) -> ResolutionReport {
        self.resolve_scope(company_id, ResolutionReport::default())
            .await
    }

    /// Signals automated tasks that were created directly in
    /// `needs_attention`.
    ///
    /// Their dependents may already count as satisfied, so each company that
    /// received a signal is resolved once more.
    pub async fn announce_created(&self, tasks: &[Task]) -> ResolutionReport {
        let mut report = ResolutionReport::default();
        let mut signalled_scopes: Vec<CompanyId> = Vec::new();
        for task in tasks
            .iter()
            .filter(|task| task.status() == TaskStatus::NeedsAttention)
        {
            report.transitioned.push(task.id());
            if task.kind() == TaskKind::Automated {
                self.queue_dispatch(task, &mut report);
                if !signalled_scopes.contains(&task.company_id()) {
                    signalled_scopes.push(task.company_id());
                }
            }
        }
        for company_id in signalled_scopes {
            report = self.resolve_scope(company_id, report).await;
        }
        report
    }

    async fn resolve_scope(
        &self,
        company_id: CompanyId,
        mut report: ResolutionReport,
    ) -> ResolutionReport {
        let unblocked = {
            let lock = self.scope_lock(company_id);
            let _guard = lock.lock().await;
            self.transition_ready(company_id, &mut report).await
        };
        self.release_scope_lock(company_id);

        for task in &unblocked {
            self.queue_dispatch(task, &mut report);
        }
        report
    }

    /// Transitions every ready task and returns the automated ones.
    ///
    /// A queued automated task satisfies its own dependents, so the scope is
    /// evaluated again until a pass unblocks no automated task. Each repeat
    /// needs a fresh `upcoming` to `needs_attention` write, which bounds the
    /// loop by the scope size.
    async fn transition_ready(
        &self,
        company_id: CompanyId,
        report: &mut ResolutionReport,
    ) -> Vec<Task> {
        let mut automated = Vec::new();
        let mut failed_writes: HashSet<TaskId> = HashSet::new();
        let mut first_pass = true;
        loop {
            let scope = match self.repository.list_by_company(company_id).await {
                Ok(scope) => scope,
                Err(err) => {
                    error!(%company_id, error = %err, "failed to load company tasks");
                    report.issues.push(ResolutionIssue::StoreReadFailure(err));
                    return automated;
                }
            };

            let evaluation = evaluate_scope(company_id, &scope);
            if first_pass {
                for (task_id, reference) in evaluation.unresolved {
                    debug!(%task_id, %reference, "dependency reference matches no task");
                    report
                        .issues
                        .push(ResolutionIssue::DependencyUnresolved { task_id, reference });
                }
            }

            let queued_before = automated.len();
            for task_id in evaluation.ready {
                if failed_writes.contains(&task_id) {
                    continue;
                }
                match self
                    .repository
                    .compare_and_set_status(
                        task_id,
                        TaskStatus::Upcoming,
                        TaskStatus::NeedsAttention,
                        self.clock.utc(),
                    )
                    .await
                {
                    Ok(Some(task)) => {
                        info!(%task_id, kind = %task.kind(), "task needs attention");
                        report.transitioned.push(task_id);
                        if task.kind() == TaskKind::Automated {
                            automated.push(task);
                        }
                    }
                    Ok(None) => debug!(%task_id, "task already left upcoming"),
                    Err(err) => {
                        warn!(%task_id, error = %err, "failed to transition task; skipping");
                        failed_writes.insert(task_id);
                        report
                            .issues
                            .push(ResolutionIssue::StoreWriteFailure { task_id, error: err });
                    }
                }
            }

            if automated.len() == queued_before {
                return automated;
            }
            debug!(%company_id, "queued automated tasks may unblock dependents; re-evaluating");
            first_pass = false;
        }
    }

    fn queue_dispatch(&self, task: &Task, report: &mut ResolutionReport) {
        let request = AutomationRequest::for_task(task);
        let trigger = Arc::clone(&self.trigger);
        report.triggered.push(task.id());
        tokio::spawn(async move {
            match trigger.dispatch(&request).await {
                Ok(()) => info!(
                    task_id = %request.task_id,
                    dedup_key = %request.dedup_key,
                    "automation triggered"
                ),
                Err(err) => warn!(
                    task_id = %request.task_id,
                    error = %err,
                    "automation trigger failed; task stays actionable"
                ),
            }
        });
    }

    fn scope_lock(&self, company_id: CompanyId) -> Arc<Mutex<()>> {
        self.scope_locks
            .entry(company_id)
            .or_default()
            .value()
            .clone()
    }

    /// Drops the company's lock once no run holds or waits on it.
    fn release_scope_lock(&self, company_id: CompanyId) {
        self.scope_locks
            .remove_if(&company_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    pub(crate) fn tracked_scopes(&self) -> usize {
        self.scope_locks.len()
    }
}
