//! Identity module - accounts and authentication
//!
//! `UserService` orchestrates sign-up, sign-in/out, profile edits and the
//! admin-only user management use-cases.

pub mod service;

pub use service::{SignInResult, SignUpCommand, UserService};
