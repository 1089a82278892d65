//! Role-based access checks and the role-aware navigation menu

use tracing::warn;

use super::session::Session;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRole};

/// Resolve the signed-in user and require the admin role.
///
/// The role is read from the store, not from the session. Nothing else is
/// fetched before this check passes.
pub async fn require_admin(repos: &dyn RepositoryProvider, session: Option<&Session>) -> DomainResult<User> {
    let user = require_user(repos, session).await?;
    if !user.role.is_admin() {
        warn!(user_id = %user.id, role = %user.role, "Admin area access denied");
        return Err(DomainError::Forbidden(
            "Administrator role required".to_string(),
        ));
    }
    Ok(user)
}

/// Resolve the signed-in user from the store.
pub async fn require_user(repos: &dyn RepositoryProvider, session: Option<&Session>) -> DomainResult<User> {
    let Some(session) = session else {
        return Err(DomainError::Unauthorized(
            "Sign in to continue".to_string(),
        ));
    };

    repos
        .users()
        .get_user_by_id(&session.user_id)
        .await?
        .ok_or_else(|| DomainError::Unauthorized("Account no longer exists".to_string()))
}

/// One entry of the navigation menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSection {
    pub key: &'static str,
    pub path: &'static str,
}

const fn section(key: &'static str, path: &'static str) -> MenuSection {
    MenuSection { key, path }
}

/// Sections reachable with the given role; `None` means signed out.
pub fn menu_for(role: Option<UserRole>) -> Vec<MenuSection> {
    let Some(role) = role else {
        return vec![section("login", "/login"), section("signup", "/signup")];
    };

    let mut menu = vec![
        section("dashboard", "/dashboard"),
        section("concrete_request", "/concrete-request"),
        section("steel_request", "/steel-request"),
        section("my_requests", "/requests"),
        section("profile", "/profile"),
    ];
    if role.is_admin() {
        menu.push(section("admin", "/admin"));
    }
    menu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_section_only_for_admins() {
        let keys = |role| menu_for(role).iter().map(|s| s.key).collect::<Vec<_>>();

        assert_eq!(keys(None), vec!["login", "signup"]);
        assert!(!keys(Some(UserRole::Seller)).contains(&"admin"));
        assert!(keys(Some(UserRole::Admin)).contains(&"admin"));
        assert!(keys(Some(UserRole::Buyer)).contains(&"steel_request"));
    }
}
