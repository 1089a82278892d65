use super::{Profile, UserRole};

/// New account as handed to the store; the password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub profile: Profile,
}
