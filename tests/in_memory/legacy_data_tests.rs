//! In-memory integration tests for records written before id rewriting.

use chrono::Utc;
use renewal_desk::task::{
    domain::{
        CompanyId, DependencyRef, PersistedTaskData, Task, TaskId, TaskKind, TaskStatus,
        TemplateId,
    },
    ports::TaskRepository,
    services::UpdateTaskStatusRequest,
};
use rstest::rstest;

use super::helpers::{Stack, stack, status_in};

fn legacy_task(
    company_id: CompanyId,
    template_id: &str,
    status: TaskStatus,
    dependencies: Vec<DependencyRef>,
) -> Task {
    let now = Utc::now();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        company_id,
        template_id: Some(TemplateId::new(template_id)),
        title: format!("Legacy step {template_id}"),
        kind: TaskKind::Manual,
        status,
        dependencies,
        created_at: now,
        updated_at: now,
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn template_keyed_dependencies_still_resolve(stack: Stack) -> Result<(), eyre::Report> {
    let company = CompanyId::new();
    let intake = legacy_task(company, "3", TaskStatus::NeedsAttention, vec![]);
    let numeric = legacy_task(company, "4", TaskStatus::Upcoming, vec![DependencyRef::from(3_u64)]);
    let textual = legacy_task(company, "5", TaskStatus::Upcoming, vec![DependencyRef::new("3")]);
    stack
        .repository
        .store_all(&[intake.clone(), numeric.clone(), textual.clone()])
        .await?;

    let outcome = stack
        .service
        .update_status(UpdateTaskStatusRequest::new(intake.id(), "Complete"))
        .await?;

    let report = outcome
        .report
        .ok_or_else(|| eyre::eyre!("completion should resolve dependents"))?;
    eyre::ensure!(
        report.transitioned() == [numeric.id(), textual.id()],
        "both reference forms should match template 3"
    );
    let listed = stack.service.list_company_tasks(company).await?;
    eyre::ensure!(
        status_in(&listed, numeric.id())? == TaskStatus::NeedsAttention,
        "numeric reference should be stored as actionable"
    );
    Ok(())
}
