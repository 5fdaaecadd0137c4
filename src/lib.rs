//! Renewal Desk: task orchestration for insurance renewal workflows.
//!
//! This crate tracks the tasks of each company's renewal, resolves task
//! dependencies when work completes, and starts automated tasks once they
//! become actionable.
//!
//! # Architecture
//!
//! Renewal Desk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, webhooks)
//!
//! # Modules
//!
//! - [`task`]: Workflow creation, status updates, and dependency resolution
//! - [`api`]: HTTP surface over the task services
//! - [`config`]: Service configuration from the environment
//! - [`logging`]: Tracing subscriber setup

pub mod api;
pub mod config;
pub mod logging;
pub mod task;
