//! HTTP route handlers.

use super::types::{
    ApiError, CreateRenewalBody, HealthResponse, RenewalCreatedResponse, StatusUpdateResponse,
    UpdateStatusBody,
};
use crate::task::{
    domain::{CompanyId, Task, TaskId},
    ports::{AutomationTrigger, TaskRepository},
    services::{InitializeWorkflowRequest, TaskWorkflowService, UpdateTaskStatusRequest},
};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use mockable::Clock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Shared state handed to every handler.
pub type SharedWorkflow<R, T, C> = Arc<TaskWorkflowService<R, T, C>>;

/// Builds the service router.
pub fn router<R, T, C>(workflow: SharedWorkflow<R, T, C>) -> Router
where
    R: TaskRepository + 'static,
    T: AutomationTrigger + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/api/health", get(health))
        .route("/api/tasks/status", post(update_status::<R, T, C>))
        .route(
            "/api/companies/{company_id}/tasks",
            get(list_company_tasks::<R, T, C>),
        )
        .route(
            "/api/companies/{company_id}/renewals",
            post(create_renewal::<R, T, C>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(workflow)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn update_status<R, T, C>(
    State(workflow): State<SharedWorkflow<R, T, C>>,
    body: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>, ApiError>
where
    R: TaskRepository + 'static,
    T: AutomationTrigger + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let task_id = body
        .task_id
        .parse::<TaskId>()
        .map_err(|err| ApiError::bad_request(format!("invalid taskId: {err}")))?;

    let outcome = workflow
        .update_status(UpdateTaskStatusRequest::new(task_id, body.status))
        .await?;

    let message = match &outcome.report {
        Some(report) => {
            debug!(
                issues = report.issues().len(),
                "dependency resolution finished"
            );
            format!(
                "task {} is {}; {} dependent task(s) now need attention",
                outcome.task.id(),
                outcome.task.status(),
                report.transitioned().len()
            )
        }
        None => format!("task {} is {}", outcome.task.id(), outcome.task.status()),
    };
    Ok(Json(StatusUpdateResponse {
        success: true,
        message,
        task: outcome.task,
    }))
}

async fn list_company_tasks<R, T, C>(
    State(workflow): State<SharedWorkflow<R, T, C>>,
    Path(company_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError>
where
    R: TaskRepository + 'static,
    T: AutomationTrigger + 'static,
    C: Clock + Send + Sync + 'static,
{
    let company_id = parse_company_id(&company_id)?;
    Ok(Json(workflow.list_company_tasks(company_id).await?))
}

async fn create_renewal<R, T, C>(
    State(workflow): State<SharedWorkflow<R, T, C>>,
    Path(company_id): Path<String>,
    body: Result<Json<CreateRenewalBody>, JsonRejection>,
) -> Result<(StatusCode, Json<RenewalCreatedResponse>), ApiError>
where
    R: TaskRepository + 'static,
    T: AutomationTrigger + 'static,
    C: Clock + Send + Sync + 'static,
{
    let company_id = parse_company_id(&company_id)?;
    let Json(body) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let created = workflow
        .initialize_workflow(
            InitializeWorkflowRequest::new(company_id, body.company_name)
                .with_templates(body.templates),
        )
        .await?;

    let message = format!(
        "created {} task(s); {} need attention",
        created.tasks.len(),
        created.report.transitioned().len()
    );
    Ok((
        StatusCode::CREATED,
        Json(RenewalCreatedResponse {
            success: true,
            message,
            tasks: created.tasks,
        }),
    ))
}

fn parse_company_id(raw: &str) -> Result<CompanyId, ApiError> {
    raw.parse::<CompanyId>()
        .map_err(|err| ApiError::bad_request(format!("invalid company id: {err}")))
}
