//! Authentication module - register, login, logout, current user, menu

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
