//! Request lifecycle: submission by buyers, triage by administrators

mod stats;
mod submission;
mod workflow;

pub use stats::{OwnRequestStats, RequestStats};
pub use submission::SubmissionService;
pub use workflow::{AdminSnapshot, AdminWorkflow, TransitionOutcome};
