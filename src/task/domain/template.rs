//! Workflow templates and their instantiation into company tasks.

use super::{
    CompanyId, DependencyRef, Task, TaskDomainError, TaskDraft, TaskId, TaskKind, TaskStatus,
    TemplateId,
};
use minijinja::{Environment, context};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One step of a renewal workflow template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    /// Template identifier, unique within one workflow.
    pub template_id: TemplateId,
    /// Title as a `minijinja` template; `company_name` is in scope.
    pub title: String,
    /// Manual or automated.
    pub kind: TaskKind,
    /// Templates this step waits on.
    #[serde(default)]
    pub dependencies: Vec<TemplateId>,
}

impl TaskTemplate {
    /// Creates a manual template with no dependencies.
    #[must_use]
    pub fn new(template_id: impl Into<TemplateId>, title: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            title: title.into(),
            kind: TaskKind::Manual,
            dependencies: Vec::new(),
        }
    }

    /// Sets the task kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the template dependencies.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TemplateId>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }
}

/// Creates the tasks of one workflow instance from its templates.
///
/// Dependencies are rewritten from template ids to the ids of the created
/// tasks. Tasks without dependencies start in `needs_attention`; all others
/// start `upcoming`. Output order follows template order.
///
/// # Errors
///
/// Returns [`TaskDomainError::DuplicateTemplate`],
/// [`TaskDomainError::UnknownTemplateDependency`] or
/// [`TaskDomainError::CyclicTemplateDependency`] for malformed template sets,
/// and title validation or rendering errors.
pub fn instantiate_workflow(
    company_id: CompanyId,
    company_name: &str,
    templates: &[TaskTemplate],
    clock: &impl Clock,
) -> Result<Vec<Task>, TaskDomainError> {
    ensure_unique_templates(templates)?;

    let environment = Environment::new();
    let mut tasks = Vec::with_capacity(templates.len());
    let mut ids_by_template: HashMap<&TemplateId, TaskId> = HashMap::new();
    for template in templates {
        let title = environment
            .render_str(&template.title, context! { company_name => company_name })
            .map_err(|error| TaskDomainError::TemplateRender {
                template_id: template.template_id.clone(),
                reason: error.to_string(),
            })?;
        let draft = TaskDraft::new(company_id, title)
            .with_template_id(template.template_id.clone())
            .with_kind(template.kind);
        let task = Task::new(draft, clock)?;
        ids_by_template.insert(&template.template_id, task.id());
        tasks.push(task);
    }

    for (task, template) in tasks.iter_mut().zip(templates) {
        let dependencies = template
            .dependencies
            .iter()
            .map(|dependency| {
                ids_by_template
                    .get(dependency)
                    .map(|id| DependencyRef::from(*id))
                    .ok_or_else(|| TaskDomainError::UnknownTemplateDependency {
                        template_id: template.template_id.clone(),
                        dependency: dependency.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        task.replace_dependencies(dependencies);
        if task.dependencies().is_empty() {
            task.transition_to(TaskStatus::NeedsAttention, clock)?;
        }
    }
    ensure_acyclic(templates)?;
    Ok(tasks)
}

fn ensure_unique_templates(templates: &[TaskTemplate]) -> Result<(), TaskDomainError> {
    let mut seen = HashSet::new();
    for template in templates {
        if !seen.insert(&template.template_id) {
            return Err(TaskDomainError::DuplicateTemplate(
                template.template_id.clone(),
            ));
        }
    }
    Ok(())
}

/// Peels off templates whose dependencies are all placed; whatever remains
/// sits on or behind a cycle.
fn ensure_acyclic(templates: &[TaskTemplate]) -> Result<(), TaskDomainError> {
    let mut placed: HashSet<&TemplateId> = HashSet::with_capacity(templates.len());
    let mut pending: Vec<&TaskTemplate> = templates.iter().collect();
    while let Some(stuck) = pending.first().copied() {
        let before = pending.len();
        pending.retain(|candidate| {
            let template: &TaskTemplate = *candidate;
            let ready = template
                .dependencies
                .iter()
                .all(|dependency| placed.contains(dependency));
            if ready {
                placed.insert(&template.template_id);
            }
            !ready
        });
        if pending.len() == before {
            return Err(TaskDomainError::CyclicTemplateDependency(
                stuck.template_id.clone(),
            ));
        }
    }
    Ok(())
}
