//! Task aggregate root.

use super::{CompanyId, DependencyRef, TaskDomainError, TaskId, TaskKind, TaskStatus, TemplateId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A unit of work inside one company's renewal workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    company_id: CompanyId,
    template_id: Option<TemplateId>,
    title: String,
    kind: TaskKind,
    status: TaskStatus,
    dependencies: Vec<DependencyRef>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Owning company.
    pub company_id: CompanyId,
    /// Template the task is instantiated from, if any.
    pub template_id: Option<TemplateId>,
    /// Display title.
    pub title: String,
    /// Manual or automated.
    pub kind: TaskKind,
    /// References to the tasks this one waits on.
    pub dependencies: Vec<DependencyRef>,
}

impl TaskDraft {
    /// Creates a manual task draft with no template and no dependencies.
    #[must_use]
    pub fn new(company_id: CompanyId, title: impl Into<String>) -> Self {
        Self {
            company_id,
            template_id: None,
            title: title.into(),
            kind: TaskKind::Manual,
            dependencies: Vec::new(),
        }
    }

    /// Sets the source template identifier.
    #[must_use]
    pub fn with_template_id(mut self, template_id: TemplateId) -> Self {
        self.template_id = Some(template_id);
        self
    }

    /// Sets the task kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the dependency references.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = DependencyRef>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Source template identifier, if any.
    pub template_id: Option<TemplateId>,
    /// Display title.
    pub title: String,
    /// Manual or automated.
    pub kind: TaskKind,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted dependency references.
    pub dependencies: Vec<DependencyRef>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest status timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `upcoming` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            company_id: draft.company_id,
            template_id: draft.template_id,
            title: title.to_owned(),
            kind: draft.kind,
            status: TaskStatus::Upcoming,
            dependencies: draft.dependencies,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            company_id: data.company_id,
            template_id: data.template_id,
            title: data.title,
            kind: data.kind,
            status: data.status,
            dependencies: data.dependencies,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the source template identifier, if any.
    #[must_use]
    pub const fn template_id(&self) -> Option<&TemplateId> {
        self.template_id.as_ref()
    }

    /// Returns the display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task kind.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the dependency references in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[DependencyRef] {
        &self.dependencies
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest status timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when this task satisfies a dependent's precondition.
    ///
    /// Automated tasks count once they are queued (`needs_attention`), not
    /// only once completed.
    #[must_use]
    pub const fn satisfies_dependents(&self) -> bool {
        match self.status {
            TaskStatus::Completed => true,
            TaskStatus::NeedsAttention => matches!(self.kind, TaskKind::Automated),
            TaskStatus::Upcoming => false,
        }
    }

    /// Replaces the dependency list during workflow instantiation.
    pub(super) fn replace_dependencies(&mut self, dependencies: Vec<DependencyRef>) {
        self.dependencies = dependencies;
    }

    /// Moves the task forward to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when `target` is
    /// not a forward step from the current status.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = clock.utc();
        Ok(())
    }
}
