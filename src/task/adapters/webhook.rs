//! Automation trigger adapters for real deployments.

use crate::task::ports::{
    AutomationRequest, AutomationTrigger, AutomationTriggerError, AutomationTriggerResult,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Header carrying the transition dedup key.
const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Posts automation signals as JSON to an executor endpoint.
#[derive(Debug, Clone)]
pub struct WebhookAutomationTrigger {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookAutomationTrigger {
    /// Creates a trigger posting to `endpoint` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AutomationTriggerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AutomationTriggerError::transport)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Returns the executor endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AutomationTrigger for WebhookAutomationTrigger {
    async fn dispatch(&self, request: &AutomationRequest) -> AutomationTriggerResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(IDEMPOTENCY_HEADER, &request.dedup_key)
            .json(request)
            .send()
            .await
            .map_err(AutomationTriggerError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AutomationTriggerError::Rejected {
                task_id: request.task_id,
                status: status.as_u16(),
            });
        }
        debug!(task_id = %request.task_id, status = status.as_u16(), "automation signal accepted");
        Ok(())
    }
}

/// Trigger used when no executor is configured: logs and drops the signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingAutomationTrigger;

#[async_trait]
impl AutomationTrigger for LoggingAutomationTrigger {
    async fn dispatch(&self, request: &AutomationRequest) -> AutomationTriggerResult<()> {
        info!(
            task_id = %request.task_id,
            company_id = %request.company_id,
            dedup_key = %request.dedup_key,
            "no automation executor configured; signal dropped"
        );
        Ok(())
    }
}
