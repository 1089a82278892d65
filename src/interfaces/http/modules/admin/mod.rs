//! Admin dashboard: stats, request triage, user roles

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
