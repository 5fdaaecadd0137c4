//! Renewal task workflows for Renewal Desk.
//!
//! This module creates a company's renewal tasks from templates, applies
//! status changes, and moves dependent tasks to `needs_attention` once every
//! task they wait on is satisfied. Automated tasks that become actionable are
//! handed to an external executor. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
