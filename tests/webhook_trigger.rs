//! Webhook automation trigger tests against a mock executor.

use std::time::Duration;

use renewal_desk::task::{
    adapters::WebhookAutomationTrigger,
    domain::{CompanyId, TaskId, TaskStatus},
    ports::{AutomationRequest, AutomationTrigger, AutomationTriggerError, dedup_key},
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signal() -> AutomationRequest {
    let task_id = TaskId::new();
    AutomationRequest {
        task_id,
        company_id: CompanyId::new(),
        dedup_key: dedup_key(task_id, TaskStatus::NeedsAttention),
    }
}

fn trigger_for(server: &MockServer) -> Result<WebhookAutomationTrigger, eyre::Report> {
    Ok(WebhookAutomationTrigger::new(
        format!("{}/automations/start", server.uri()),
        Duration::from_millis(500),
    )?)
}

#[tokio::test]
async fn dispatch_posts_signal_with_idempotency_key() -> Result<(), eyre::Report> {
    let server = MockServer::start().await;
    let request = signal();

    Mock::given(method("POST"))
        .and(path("/automations/start"))
        .and(header("Idempotency-Key", request.dedup_key.as_str()))
        .and(body_json(json!({
            "task_id": request.task_id.to_string(),
            "company_id": request.company_id.to_string(),
            "dedup_key": request.dedup_key,
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    trigger_for(&server)?.dispatch(&request).await?;
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_a_rejection() -> Result<(), eyre::Report> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let request = signal();

    let result = trigger_for(&server)?.dispatch(&request).await;

    eyre::ensure!(
        matches!(
            result,
            Err(AutomationTriggerError::Rejected { task_id, status: 503 }) if task_id == request.task_id
        ),
        "unexpected result {result:?}"
    );
    Ok(())
}

#[tokio::test]
async fn slow_executor_is_a_transport_error() -> Result<(), eyre::Report> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let result = trigger_for(&server)?.dispatch(&signal()).await;

    eyre::ensure!(
        matches!(result, Err(AutomationTriggerError::Transport(_))),
        "unexpected result {result:?}"
    );
    Ok(())
}
