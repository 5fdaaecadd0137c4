//! In-memory automation trigger that records every dispatched signal.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::{Instant, sleep};

use crate::task::ports::{
    AutomationRequest, AutomationTrigger, AutomationTriggerError, AutomationTriggerResult,
};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Automation trigger that keeps dispatched signals in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingAutomationTrigger {
    dispatched: Arc<RwLock<Vec<AutomationRequest>>>,
}

impl RecordingAutomationTrigger {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the signals dispatched so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn dispatched(&self) -> AutomationTriggerResult<Vec<AutomationRequest>> {
        let dispatched = self.dispatched.read().map_err(|err| {
            AutomationTriggerError::transport(std::io::Error::other(err.to_string()))
        })?;
        Ok(dispatched.clone())
    }

    /// Waits until at least `count` signals arrived or `timeout` elapsed,
    /// then returns everything recorded so far.
    ///
    /// Signals are delivered on background tasks, so callers observing them
    /// right after a resolver run wait here first.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub async fn wait_for(
        &self,
        count: usize,
        timeout: Duration,
    ) -> AutomationTriggerResult<Vec<AutomationRequest>> {
        let deadline = Instant::now() + timeout;
        loop {
            let dispatched = self.dispatched()?;
            if dispatched.len() >= count || Instant::now() >= deadline {
                return Ok(dispatched);
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl AutomationTrigger for RecordingAutomationTrigger {
    async fn dispatch(&self, request: &AutomationRequest) -> AutomationTriggerResult<()> {
        let mut dispatched = self.dispatched.write().map_err(|err| {
            AutomationTriggerError::transport(std::io::Error::other(err.to_string()))
        })?;
        dispatched.push(request.clone());
        Ok(())
    }
}
