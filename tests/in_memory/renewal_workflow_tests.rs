//! In-memory integration tests for renewal workflow progression.

use std::time::Duration;

use super::helpers::{Stack, stack, status_in};
use renewal_desk::task::{
    domain::{CompanyId, TaskKind, TaskStatus, TaskTemplate, TemplateId},
    services::{InitializeWorkflowRequest, UpdateTaskStatusRequest},
};
use rstest::rstest;

fn standard_renewal(company_id: CompanyId) -> InitializeWorkflowRequest {
    InitializeWorkflowRequest::new(company_id, "Northwind Trading").with_templates([
        TaskTemplate::new("kickoff", "Renewal kickoff with {{ company_name }}"),
        TaskTemplate::new("exposures", "Update exposure schedule")
            .with_dependencies([TemplateId::from("kickoff")]),
        TaskTemplate::new("loss-runs", "Order loss runs")
            .with_kind(TaskKind::Automated)
            .with_dependencies([TemplateId::from("kickoff")]),
        TaskTemplate::new("submission", "Send market submission")
            .with_dependencies([TemplateId::from("exposures"), TemplateId::from("loss-runs")]),
        TaskTemplate::new("bind", "Bind coverage")
            .with_dependencies([TemplateId::from("submission")]),
    ])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_tasks_moves_the_renewal_forward(stack: Stack) -> Result<(), eyre::Report> {
    let company = CompanyId::new();
    let created = stack
        .service
        .initialize_workflow(standard_renewal(company))
        .await?;
    let [kickoff, exposures, loss_runs, submission, bind] = created.tasks.as_slice() else {
        return Err(eyre::eyre!("expected five tasks"));
    };
    eyre::ensure!(
        kickoff.title() == "Renewal kickoff with Northwind Trading",
        "title should be rendered"
    );

    stack
        .service
        .update_status(UpdateTaskStatusRequest::new(kickoff.id(), "completed"))
        .await?;
    let listed = stack.service.list_company_tasks(company).await?;
    eyre::ensure!(
        status_in(&listed, exposures.id())? == TaskStatus::NeedsAttention,
        "exposure update should be actionable"
    );
    eyre::ensure!(
        status_in(&listed, loss_runs.id())? == TaskStatus::NeedsAttention,
        "loss runs should be queued"
    );
    eyre::ensure!(
        status_in(&listed, submission.id())? == TaskStatus::Upcoming,
        "submission waits on the manual exposure update"
    );

    stack
        .service
        .update_status(UpdateTaskStatusRequest::new(exposures.id(), "Complete"))
        .await?;
    let listed = stack.service.list_company_tasks(company).await?;
    eyre::ensure!(
        status_in(&listed, submission.id())? == TaskStatus::NeedsAttention,
        "queued loss runs plus completed exposures unblock submission"
    );
    eyre::ensure!(
        status_in(&listed, bind.id())? == TaskStatus::Upcoming,
        "binding waits on the submission"
    );

    let signalled: Vec<_> = stack
        .trigger
        .wait_for(1, Duration::from_secs(2))
        .await?
        .into_iter()
        .map(|request| request.task_id)
        .collect();
    eyre::ensure!(
        signalled == [loss_runs.id()],
        "only the automated task is signalled, once"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn automated_root_step_unblocks_its_reviewer_at_creation(
    stack: Stack,
) -> Result<(), eyre::Report> {
    let company = CompanyId::new();
    let request = InitializeWorkflowRequest::new(company, "Northwind Trading").with_templates([
        TaskTemplate::new(1_u64, "Pull carrier appetite").with_kind(TaskKind::Automated),
        TaskTemplate::new(2_u64, "Review appetite report")
            .with_dependencies([TemplateId::from(1_u64)]),
    ]);

    let created = stack.service.initialize_workflow(request).await?;
    let [appetite, review] = created.tasks.as_slice() else {
        return Err(eyre::eyre!("expected two tasks"));
    };

    let listed = stack.service.list_company_tasks(company).await?;
    eyre::ensure!(
        status_in(&listed, review.id())? == TaskStatus::NeedsAttention,
        "a queued automated step satisfies its reviewer straight away"
    );
    eyre::ensure!(
        created.report.transitioned() == [appetite.id(), review.id()],
        "unexpected transitions {:?}",
        created.report.transitioned()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_intake_reaches_the_review_behind_an_automated_step(
    stack: Stack,
) -> Result<(), eyre::Report> {
    let company = CompanyId::new();
    let request = InitializeWorkflowRequest::new(company, "Northwind Trading").with_templates([
        TaskTemplate::new("intake", "Intake call"),
        TaskTemplate::new("submit", "Submit to markets")
            .with_kind(TaskKind::Automated)
            .with_dependencies([TemplateId::from("intake")]),
        TaskTemplate::new("review", "Review market responses")
            .with_dependencies([TemplateId::from("submit")]),
    ]);
    let created = stack.service.initialize_workflow(request).await?;
    let [intake, submit, review] = created.tasks.as_slice() else {
        return Err(eyre::eyre!("expected three tasks"));
    };

    stack
        .service
        .update_status(UpdateTaskStatusRequest::new(intake.id(), "completed"))
        .await?;

    let listed = stack.service.list_company_tasks(company).await?;
    eyre::ensure!(
        status_in(&listed, submit.id())? == TaskStatus::NeedsAttention,
        "submission should be queued"
    );
    eyre::ensure!(
        status_in(&listed, review.id())? == TaskStatus::NeedsAttention,
        "review should not wait for the automated step to finish"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workflows_of_different_companies_are_isolated(
    stack: Stack,
) -> Result<(), eyre::Report> {
    let first = CompanyId::new();
    let second = CompanyId::new();
    let first_tasks = stack
        .service
        .initialize_workflow(standard_renewal(first))
        .await?
        .tasks;
    stack
        .service
        .initialize_workflow(standard_renewal(second))
        .await?;

    let kickoff = first_tasks
        .first()
        .ok_or_else(|| eyre::eyre!("missing kickoff task"))?;
    stack
        .service
        .update_status(UpdateTaskStatusRequest::new(kickoff.id(), "completed"))
        .await?;

    let untouched = stack.service.list_company_tasks(second).await?;
    let actionable = untouched
        .iter()
        .filter(|task| task.status() == TaskStatus::NeedsAttention)
        .count();
    eyre::ensure!(
        actionable == 1,
        "second company should only have its kickoff actionable, found {actionable}"
    );
    Ok(())
}
