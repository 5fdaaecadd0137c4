//! API request and response types.

use crate::task::{
    domain::{Task, TaskDomainError, TaskTemplate},
    ports::TaskRepositoryError,
    services::TaskWorkflowError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body of `POST /api/tasks/status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    /// Task identifier as a UUID string.
    pub task_id: String,
    /// Requested status, in any known spelling.
    pub status: String,
}

/// Body of `POST /api/companies/{company_id}/renewals`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRenewalBody {
    /// Company name rendered into template titles.
    pub company_name: String,
    /// Workflow steps in display order.
    pub templates: Vec<TaskTemplate>,
}

/// Response to a status update.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateResponse {
    /// Always `true`; failures use [`ApiError`].
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Task after the update.
    pub task: Task,
}

/// Response to a workflow creation.
#[derive(Debug, Clone, Serialize)]
pub struct RenewalCreatedResponse {
    /// Always `true`; failures use [`ApiError`].
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Created tasks in template order.
    pub tasks: Vec<Task>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// Error response carrying `{"success": false, "message": ...}`.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
}

impl ApiError {
    /// Creates an error response.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a `400 Bad Request` response.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<TaskWorkflowError> for ApiError {
    fn from(err: TaskWorkflowError) -> Self {
        let status = match &err {
            TaskWorkflowError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            TaskWorkflowError::NotFound(_)
            | TaskWorkflowError::Repository(TaskRepositoryError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            TaskWorkflowError::Domain(TaskDomainError::InvalidStatusTransition { .. })
            | TaskWorkflowError::ConcurrentUpdate(_)
            | TaskWorkflowError::Repository(TaskRepositoryError::DuplicateTask(_)) => {
                StatusCode::CONFLICT
            }
            TaskWorkflowError::Domain(_) => StatusCode::BAD_REQUEST,
            TaskWorkflowError::Repository(TaskRepositoryError::Persistence(_)) => {
                error!(error = %err, "task store failure");
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "task store unavailable");
            }
        };
        Self::new(status, err.to_string())
    }
}
