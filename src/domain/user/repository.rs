use async_trait::async_trait;

use super::{CreateUserDto, GetUserDto, UpdateProfileDto, User, UserRole};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

/// The `profiles` collection of the record store.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>>;
    async fn count_users(&self) -> DomainResult<u64>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    async fn update_profile(&self, id: &str, dto: UpdateProfileDto) -> DomainResult<Option<User>>;
    async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<Option<User>>;
    async fn touch_last_login(&self, id: &str) -> DomainResult<()>;
}
