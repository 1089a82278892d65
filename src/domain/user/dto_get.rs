use super::UserRole;
use crate::shared::PageRequest;

#[derive(Debug, Clone)]
pub struct GetUserDto {
    /// Matches email or company name
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub window: PageRequest,
}
