//! Dependency evaluation over one company's task set.
//!
//! Evaluation is pure: it reads a snapshot of the tasks in scope and reports
//! which `upcoming` tasks have every dependency satisfied. Applying the
//! resulting transitions is the resolver service's job.

use super::{CompanyId, DependencyRef, Task, TaskId, TaskStatus};
use std::collections::HashMap;

/// Lookup of tasks by id and by template id within one company.
#[derive(Debug)]
pub struct TaskIndex<'a> {
    by_id: HashMap<TaskId, &'a Task>,
    by_template: HashMap<&'a str, &'a Task>,
}

impl<'a> TaskIndex<'a> {
    /// Indexes the tasks of `scope` that belong to `company_id`.
    ///
    /// When several tasks share a template id, the first in scope order wins.
    pub fn build(company_id: CompanyId, scope: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_template = HashMap::new();
        for task in scope
            .into_iter()
            .filter(|task| task.company_id() == company_id)
        {
            by_id.entry(task.id()).or_insert(task);
            if let Some(template_id) = task.template_id() {
                by_template.entry(template_id.as_str()).or_insert(task);
            }
        }
        Self { by_id, by_template }
    }

    /// Finds the task a reference points at.
    ///
    /// Task ids take precedence over template ids.
    #[must_use]
    pub fn resolve(&self, reference: &DependencyRef) -> Option<&'a Task> {
        reference
            .as_str()
            .parse::<TaskId>()
            .ok()
            .and_then(|id| self.by_id.get(&id).copied())
            .or_else(|| self.by_template.get(reference.as_str()).copied())
    }

    /// Decides whether `task` may leave `upcoming`.
    ///
    /// Stops at the first dependency that is unresolved or unsatisfied.
    #[must_use]
    pub fn readiness(&self, task: &Task) -> Readiness {
        for reference in task.dependencies() {
            match self.resolve(reference) {
                None => return Readiness::Unresolved(reference.clone()),
                Some(dependency) if !dependency.satisfies_dependents() => {
                    return Readiness::Waiting(reference.clone());
                }
                Some(_) => {}
            }
        }
        Readiness::Ready
    }
}

/// Outcome of checking one task's dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Every dependency is satisfied, or there are none.
    Ready,
    /// The referenced dependency exists but is not yet satisfied.
    Waiting(DependencyRef),
    /// The reference matches no task in scope.
    Unresolved(DependencyRef),
}

/// Result of evaluating every `upcoming` task in a company scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeEvaluation {
    /// Tasks whose dependencies are all satisfied, in scope order.
    pub ready: Vec<TaskId>,
    /// Tasks blocked by a reference that matches no task.
    pub unresolved: Vec<(TaskId, DependencyRef)>,
}

/// Evaluates every `upcoming` task of `company_id` found in `scope`.
#[must_use]
pub fn evaluate_scope(company_id: CompanyId, scope: &[Task]) -> ScopeEvaluation {
    let index = TaskIndex::build(company_id, scope);
    let mut evaluation = ScopeEvaluation::default();
    for task in scope
        .iter()
        .filter(|task| task.company_id() == company_id && task.status() == TaskStatus::Upcoming)
    {
        match index.readiness(task) {
            Readiness::Ready => evaluation.ready.push(task.id()),
            Readiness::Unresolved(reference) => {
                evaluation.unresolved.push((task.id(), reference));
            }
            Readiness::Waiting(_) => {}
        }
    }
    evaluation
}

/// Returns the tasks unblocked after `completed_task_id` completed.
///
/// Returns an empty list when the completed task is not part of `scope`.
/// Only tasks sharing the completed task's company are considered.
#[must_use]
pub fn find_unblocked(completed_task_id: TaskId, scope: &[Task]) -> Vec<TaskId> {
    scope
        .iter()
        .find(|task| task.id() == completed_task_id)
        .map(|completed| evaluate_scope(completed.company_id(), scope).ready)
        .unwrap_or_default()
}
