//! Adapter implementations for task persistence and automation dispatch.

pub mod memory;
pub mod postgres;

mod webhook;

pub use webhook::{LoggingAutomationTrigger, WebhookAutomationTrigger};
