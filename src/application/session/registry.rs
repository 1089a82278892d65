//! Session registry - live sign-in sessions

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use crate::domain::{User, UserRole};

/// An authenticated sign-in. Created on sign-in, destroyed on sign-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub email: String,
    /// Role at sign-in time; access checks re-read the stored role
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Live sessions indexed by session id
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
}

pub type SharedSessionRegistry = Arc<SessionRegistry>;

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session for `user`
    pub fn open(&self, user: &User, expires_at: DateTime<Utc>) -> Session {
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: Utc::now(),
            expires_at,
        };
        info!(session_id = %session.id, user_id = %user.id, "Session opened");
        self.sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Live session by id. Expired sessions are dropped on lookup.
    pub fn get(&self, session_id: &str) -> Option<Session> {
        let session = self.sessions.get(session_id)?.value().clone();
        if session.is_expired() {
            self.sessions.remove(session_id);
            debug!(session_id, "Session expired");
            return None;
        }
        Some(session)
    }

    pub fn close(&self, session_id: &str) -> bool {
        let closed = self.sessions.remove(session_id).is_some();
        if closed {
            info!(session_id, "Session closed");
        }
        closed
    }

    /// Drop expired sessions, returns how many were removed
    pub fn purge_expired(&self) -> usize {
        // Counted inside retain; sessions opened meanwhile must not skew it
        let mut removed = 0;
        self.sessions.retain(|_, s| {
            let keep = !s.is_expired();
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::Profile;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: "u1".into(),
            email: "u1@example.com".into(),
            password_hash: String::new(),
            role: UserRole::Seller,
            profile: Profile::default(),
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[test]
    fn closed_session_is_gone() {
        let registry = SessionRegistry::new();
        let session = registry.open(&user(), Utc::now() + Duration::hours(1));

        assert_eq!(registry.get(&session.id), Some(session.clone()));
        assert!(registry.close(&session.id));
        assert_eq!(registry.get(&session.id), None);
        assert!(!registry.close(&session.id));
    }

    #[test]
    fn expired_sessions_are_not_returned() {
        let registry = SessionRegistry::new();
        let stale = registry.open(&user(), Utc::now() - Duration::seconds(1));
        let live = registry.open(&user(), Utc::now() + Duration::hours(1));

        assert_eq!(registry.purge_expired(), 1);
        assert_eq!(registry.get(&stale.id), None);
        assert!(registry.get(&live.id).is_some());
        assert_eq!(registry.session_count(), 1);
    }

    #[test]
    fn purge_ignores_sessions_opened_alongside_it() {
        let registry = Arc::new(SessionRegistry::new());
        for _ in 0..50 {
            registry.open(&user(), Utc::now() - Duration::seconds(1));
        }

        let opener = {
            let registry = registry.clone();
            std::thread::spawn(move || {
                for _ in 0..500 {
                    registry.open(&user(), Utc::now() + Duration::hours(1));
                }
            })
        };
        let mut purged = 0;
        for _ in 0..20 {
            purged += registry.purge_expired();
        }
        opener.join().unwrap();

        assert_eq!(purged + registry.purge_expired(), 50);
        assert_eq!(registry.session_count(), 500);
    }
}
