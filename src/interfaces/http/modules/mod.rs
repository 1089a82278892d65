pub mod admin;
pub mod auth;
pub mod health;
pub mod metrics;
pub mod profile;
pub mod request_id;
pub mod requests;
