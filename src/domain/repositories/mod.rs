//! Repository traits for the domain layer

use super::request::RequestRepository;
use super::user::UserRepositoryInterface;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().get_user_by_id(&session.user_id).await?;
///     let counts = repos.requests().status_counts(RequestKind::Steel, None).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn requests(&self) -> &dyn RequestRepository;
}
