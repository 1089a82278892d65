//! Database repository implementations
//!
//! Per-collection SeaORM repositories + unified RepositoryProvider.

pub mod repository_provider;
pub mod request_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
