pub mod access;
pub mod identity;
pub mod requests;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types for convenience
pub use identity::{SignInResult, SignUpCommand, UserService};
pub use requests::{
    AdminSnapshot, AdminWorkflow, OwnRequestStats, RequestStats, SubmissionService, TransitionOutcome,
};
pub use session::{Session, SessionRegistry, SharedSessionRegistry};
