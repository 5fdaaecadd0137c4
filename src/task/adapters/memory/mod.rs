//! In-memory adapters for tests and local runs.

mod task;
mod trigger;

pub use task::InMemoryTaskRepository;
pub use trigger::RecordingAutomationTrigger;
