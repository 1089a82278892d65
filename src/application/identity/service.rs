//! User management service - application-layer orchestration
//!
//! HTTP handlers are thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::application::access::{require_admin, require_user};
use crate::application::session::{Session, SharedSessionRegistry};
use crate::domain::user::{CreateUserDto, GetUserDto, UpdateProfileDto};
use crate::domain::{DomainError, DomainResult, Profile, RepositoryProvider, SellerType, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig, SessionClaims};
use crate::infrastructure::crypto::PasswordHasher;
use crate::shared::{non_blank, PaginatedResult};

const MIN_PASSWORD_LEN: usize = 6;

/// Account creation input
#[derive(Debug, Clone)]
pub struct SignUpCommand {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: UserRole,
    pub seller_type: Option<SellerType>,
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

/// Returned after a successful sign-in
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub token: String,
    pub session: Session,
    pub user: User,
}

/// User service - orchestrates all identity / user-management use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    sessions: SharedSessionRegistry,
    jwt_config: JwtConfig,
    hasher: PasswordHasher,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        sessions: SharedSessionRegistry,
        jwt_config: JwtConfig,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            repos,
            sessions,
            jwt_config,
            hasher,
        }
    }

    // ── Registration ────────────────────────────────────────────

    /// Create a buyer or seller account. Admin is never self-assignable.
    pub async fn sign_up(&self, cmd: SignUpCommand) -> DomainResult<User> {
        let email = normalize_email(&cmd.email);
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(DomainError::validation("Invalid email address"));
        }
        if cmd.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if cmd.password != cmd.password_confirmation {
            return Err(DomainError::validation("Passwords do not match"));
        }

        let seller_type = match cmd.role {
            UserRole::Admin => {
                return Err(DomainError::validation(
                    "Accounts can only register as buyer or seller",
                ))
            }
            UserRole::Seller => Some(cmd.seller_type.ok_or_else(|| {
                DomainError::validation("Sellers must choose a seller type")
            })?),
            UserRole::Buyer => None,
        };

        if self.repos.users().get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email is already registered".into()));
        }

        let password_hash = self.hasher.hash(&cmd.password)?;
        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                email,
                password_hash,
                role: cmd.role,
                profile: Profile {
                    company_name: non_blank(cmd.company_name),
                    contact_person: non_blank(cmd.contact_person),
                    phone: non_blank(cmd.phone),
                    position: non_blank(cmd.position),
                    seller_type,
                },
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "New user registered");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Verify credentials and open a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> DomainResult<SignInResult> {
        let email = normalize_email(email);
        let Some(user) = self.repos.users().get_user_by_email(&email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !self.hasher.verify(password, &user.password_hash) {
            warn!(user_id = %user.id, "Failed sign-in attempt");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        // Before open: a failed stamp must leave no session behind
        self.repos.users().touch_last_login(&user.id).await?;

        let expires_at = Utc::now() + Duration::hours(self.jwt_config.expiration_hours);
        let session = self.sessions.open(&user, expires_at);
        let claims = SessionClaims::new(
            &user.id,
            &user.email,
            user.role.as_str(),
            &session.id,
            &self.jwt_config,
        );
        let token = match create_token(&claims, &self.jwt_config) {
            Ok(token) => token,
            Err(e) => {
                self.sessions.close(&session.id);
                return Err(e.into());
            }
        };

        info!(user_id = %user.id, session_id = %session.id, "User signed in");

        Ok(SignInResult {
            token,
            session,
            user,
        })
    }

    /// Resolve a bearer token to its live session.
    pub fn authenticate(&self, token: &str) -> DomainResult<Session> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|_| DomainError::Unauthorized("Invalid or expired token".into()))?;

        match self.sessions.get(&claims.sid) {
            Some(session) if session.user_id == claims.sub => Ok(session),
            _ => Err(DomainError::Unauthorized("Session has ended".into())),
        }
    }

    pub fn sign_out(&self, session: &Session) {
        if self.sessions.close(&session.id) {
            info!(user_id = %session.user_id, "User signed out");
        }
    }

    // ── Own account ─────────────────────────────────────────────

    pub async fn current_user(&self, session: Option<&Session>) -> DomainResult<User> {
        require_user(self.repos.as_ref(), session).await
    }

    pub async fn update_profile(&self, session: &Session, dto: UpdateProfileDto) -> DomainResult<User> {
        let dto = UpdateProfileDto {
            company_name: non_blank(dto.company_name),
            contact_person: non_blank(dto.contact_person),
            phone: non_blank(dto.phone),
            position: non_blank(dto.position),
        };

        self.repos
            .users()
            .update_profile(&session.user_id, dto)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Account no longer exists".into()))
    }

    // ── Administration ──────────────────────────────────────────

    /// List users with search, role filter and pagination. Admin only.
    pub async fn list_users(&self, session: Option<&Session>, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        require_admin(self.repos.as_ref(), session).await?;
        self.repos.users().list_users(dto).await
    }

    /// Change another user's role, then return the re-fetched user. Admin only.
    pub async fn change_role(&self, session: Option<&Session>, user_id: &str, role: UserRole) -> DomainResult<User> {
        let admin = require_admin(self.repos.as_ref(), session).await?;
        if admin.id == user_id && role != UserRole::Admin {
            return Err(DomainError::Forbidden(
                "Administrators cannot remove their own admin role".into(),
            ));
        }

        let users = self.repos.users();
        users
            .update_role(user_id, role)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        let user = users
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        info!(admin_id = %admin.id, user_id, role = %role, "User role changed");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::application::session::SessionRegistry;
    use crate::application::test_support::{seed_user, session_for};
    use crate::domain::request::RequestRepository;
    use crate::domain::UserRepositoryInterface;
    use crate::infrastructure::storage::{InMemoryRequestRepository, InMemoryUserRepository};
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::shared::PageRequest;

    /// User store whose last-login write always fails.
    #[derive(Default)]
    struct LoginStampFails {
        inner: InMemoryUserRepository,
    }

    #[async_trait]
    impl UserRepositoryInterface for LoginStampFails {
        async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
            self.inner.create_user(dto).await
        }

        async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
            self.inner.list_users(dto).await
        }

        async fn count_users(&self) -> DomainResult<u64> {
            self.inner.count_users().await
        }

        async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
            self.inner.get_user_by_email(email).await
        }

        async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
            self.inner.get_user_by_id(id).await
        }

        async fn update_profile(&self, id: &str, dto: UpdateProfileDto) -> DomainResult<Option<User>> {
            self.inner.update_profile(id, dto).await
        }

        async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<Option<User>> {
            self.inner.update_role(id, role).await
        }

        async fn touch_last_login(&self, _id: &str) -> DomainResult<()> {
            Err(DomainError::Store("database is locked".into()))
        }
    }

    #[derive(Default)]
    struct BrokenLoginProvider {
        users: LoginStampFails,
        requests: InMemoryRequestRepository,
    }

    impl RepositoryProvider for BrokenLoginProvider {
        fn users(&self) -> &dyn UserRepositoryInterface {
            &self.users
        }

        fn requests(&self) -> &dyn RequestRepository {
            &self.requests
        }
    }

    fn service() -> (UserService, Arc<dyn RepositoryProvider>, SharedSessionRegistry) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let sessions = Arc::new(SessionRegistry::new());
        let jwt = JwtConfig {
            secret: "test".into(),
            expiration_hours: 1,
            issuer: "b2bsteel-test".into(),
        };
        let svc = UserService::new(repos.clone(), sessions.clone(), jwt, PasswordHasher::new(4));
        (svc, repos, sessions)
    }

    fn sign_up(email: &str, role: UserRole) -> SignUpCommand {
        SignUpCommand {
            email: email.into(),
            password: "secret1".into(),
            password_confirmation: "secret1".into(),
            role,
            seller_type: None,
            company_name: Some("Acme".into()),
            contact_person: Some("Sara".into()),
            phone: None,
            position: None,
        }
    }

    #[tokio::test]
    async fn sign_up_checks_confirmation_and_role() {
        let (svc, _, _) = service();

        let mut cmd = sign_up("a@example.com", UserRole::Buyer);
        cmd.password_confirmation = "other".into();
        assert!(matches!(svc.sign_up(cmd).await, Err(DomainError::Validation(_))));

        let cmd = sign_up("a@example.com", UserRole::Admin);
        assert!(matches!(svc.sign_up(cmd).await, Err(DomainError::Validation(_))));

        let cmd = sign_up("s@example.com", UserRole::Seller);
        assert!(matches!(svc.sign_up(cmd).await, Err(DomainError::Validation(_))));

        let mut cmd = sign_up(" S@Example.com ", UserRole::Seller);
        cmd.seller_type = Some(SellerType::Steel);
        let user = svc.sign_up(cmd).await.unwrap();
        assert_eq!(user.email, "s@example.com");
        assert_eq!(user.profile.seller_type, Some(SellerType::Steel));
    }

    #[tokio::test]
    async fn failed_login_stamp_leaves_no_session_open() {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(BrokenLoginProvider::default());
        let sessions = Arc::new(SessionRegistry::new());
        let jwt = JwtConfig {
            secret: "test".into(),
            expiration_hours: 1,
            issuer: "b2bsteel-test".into(),
        };
        let svc = UserService::new(repos, sessions.clone(), jwt, PasswordHasher::new(4));
        svc.sign_up(sign_up("d@example.com", UserRole::Buyer)).await.unwrap();

        let err = svc.sign_in("d@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, DomainError::Store(_)));
        assert_eq!(sessions.session_count(), 0);
    }

    #[tokio::test]
    async fn sign_in_then_out_revokes_token() {
        let (svc, _, sessions) = service();
        svc.sign_up(sign_up("b@example.com", UserRole::Buyer)).await.unwrap();

        assert!(matches!(
            svc.sign_in("b@example.com", "wrong").await,
            Err(DomainError::Unauthorized(_))
        ));

        let signed_in = svc.sign_in("B@example.com", "secret1").await.unwrap();
        let session = svc.authenticate(&signed_in.token).unwrap();
        assert_eq!(session.user_id, signed_in.user.id);
        assert_eq!(sessions.session_count(), 1);

        let me = svc.current_user(Some(&session)).await.unwrap();
        assert!(me.last_login_at.is_some());

        svc.sign_out(&session);
        assert!(matches!(
            svc.authenticate(&signed_in.token),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn role_change_is_admin_only_and_refetched() {
        let (svc, repos, sessions) = service();
        let admin = seed_user(repos.as_ref(), "admin@example.com", UserRole::Admin).await;
        let buyer = seed_user(repos.as_ref(), "buyer@example.com", UserRole::Buyer).await;
        let admin_session = session_for(&sessions, &admin);
        let buyer_session = session_for(&sessions, &buyer);

        let err = svc
            .change_role(Some(&buyer_session), &buyer.id, UserRole::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = svc.change_role(None, &buyer.id, UserRole::Seller).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let updated = svc
            .change_role(Some(&admin_session), &buyer.id, UserRole::Seller)
            .await
            .unwrap();
        assert_eq!(updated.role, UserRole::Seller);

        let err = svc
            .change_role(Some(&admin_session), &admin.id, UserRole::Buyer)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = svc
            .change_role(Some(&admin_session), "missing", UserRole::Buyer)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn demoted_admin_loses_access_with_the_same_session() {
        let (svc, repos, sessions) = service();
        let admin = seed_user(repos.as_ref(), "boss@example.com", UserRole::Admin).await;
        let other = seed_user(repos.as_ref(), "other@example.com", UserRole::Admin).await;
        let session = session_for(&sessions, &admin);
        let other_session = session_for(&sessions, &other);

        svc.change_role(Some(&other_session), &admin.id, UserRole::Buyer)
            .await
            .unwrap();

        let dto = GetUserDto {
            search: None,
            role: None,
            window: PageRequest::new(1, 10),
        };
        let err = svc.list_users(Some(&session), dto).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn profile_update_ignores_blank_fields() {
        let (svc, repos, sessions) = service();
        let user = seed_user(repos.as_ref(), "p@example.com", UserRole::Buyer).await;
        let session = session_for(&sessions, &user);

        let updated = svc
            .update_profile(
                &session,
                UpdateProfileDto {
                    company_name: Some("  New Co ".into()),
                    phone: Some("   ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.profile.company_name.as_deref(), Some("New Co"));
        assert_eq!(updated.profile.phone, user.profile.phone);
    }
}
