//! Shared builders for task unit tests.

use crate::task::domain::{
    CompanyId, DependencyRef, PersistedTaskData, Task, TaskId, TaskKind, TaskStatus, TemplateId,
};
use chrono::Utc;

/// Builds a persisted-looking task with explicit status and dependencies.
pub(super) fn stored_task(
    company_id: CompanyId,
    template_id: Option<&str>,
    kind: TaskKind,
    status: TaskStatus,
    dependencies: &[DependencyRef],
) -> Task {
    let now = Utc::now();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        company_id,
        template_id: template_id.map(TemplateId::from),
        title: template_id.map_or_else(|| "Ad hoc task".to_owned(), |id| format!("Step {id}")),
        kind,
        status,
        dependencies: dependencies.to_vec(),
        created_at: now,
        updated_at: now,
    })
}

/// Shorthand for a manual task.
pub(super) fn manual(
    company_id: CompanyId,
    status: TaskStatus,
    dependencies: &[DependencyRef],
) -> Task {
    stored_task(company_id, None, TaskKind::Manual, status, dependencies)
}

/// Reference to a task by its id.
pub(super) fn by_id(task: &Task) -> DependencyRef {
    DependencyRef::from(task.id())
}
