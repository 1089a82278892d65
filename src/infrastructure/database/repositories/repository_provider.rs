//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{RepositoryProvider, RequestRepository, UserRepositoryInterface};

use super::request_repository::SeaOrmRequestRepository;
use super::user_repository::UserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-collection repository accessors.
pub struct SeaOrmRepositoryProvider {
    users: UserRepository,
    requests: SeaOrmRequestRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            requests: SeaOrmRequestRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn requests(&self) -> &dyn RequestRepository {
        &self.requests
    }
}
