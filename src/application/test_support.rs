//! Fixtures shared by the application-layer tests

use chrono::{Duration, Utc};

use super::session::{Session, SessionRegistry};
use crate::domain::user::CreateUserDto;
use crate::domain::{Profile, RepositoryProvider, User, UserRole};

/// Insert a user directly, skipping password hashing.
pub(crate) async fn seed_user(repos: &dyn RepositoryProvider, email: &str, role: UserRole) -> User {
    repos
        .users()
        .create_user(CreateUserDto {
            email: email.to_string(),
            password_hash: "unused".to_string(),
            role,
            profile: Profile {
                contact_person: Some(format!("{} contact", role)),
                phone: Some("021-555-0100".to_string()),
                ..Profile::default()
            },
        })
        .await
        .expect("seed user")
}

pub(crate) fn session_for(registry: &SessionRegistry, user: &User) -> Session {
    registry.open(user, Utc::now() + Duration::hours(1))
}
