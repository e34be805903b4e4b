//! Command-line workflow driving a changelog update run

pub mod orchestration;

pub use orchestration::{run_update_workflow, UpdateWorkflowArgs, WorkflowResult};
