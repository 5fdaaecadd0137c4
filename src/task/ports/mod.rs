//! Port contracts for renewal task management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;
pub mod trigger;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use trigger::{
    AutomationRequest, AutomationTrigger, AutomationTriggerError, AutomationTriggerResult,
    dedup_key,
};
