//! Application services for renewal task orchestration.

mod resolver;
mod workflow;

pub use resolver::{ResolutionIssue, ResolutionReport, TaskStatusResolver};
pub use workflow::{
    InitializeWorkflowRequest, InitializedWorkflow, StatusUpdateOutcome, TaskWorkflowError,
    TaskWorkflowResult, TaskWorkflowService, UpdateTaskStatusRequest,
};
