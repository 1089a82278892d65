//! # B2BSteel
//!
//! Backend for a B2B marketplace of construction material requests:
//! buyers submit concrete formwork and steel structure requests,
//! administrators triage them from a status dashboard.
//!
//! ## Architecture
//!
//! - **domain**: requests, statuses, users and the repository ports
//! - **application**: identity and sessions, submission, admin workflow
//! - **infrastructure**: SeaORM/SQLite and in-memory stores, JWT, bcrypt
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiServices};
