//! Authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::access::MenuSection;
use crate::domain::User;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
    pub password_confirmation: String,
    /// `buyer` or `seller`
    #[schema(example = "buyer")]
    pub role: String,
    /// Required for sellers: `formwork` or `steel`
    pub seller_type: Option<String>,
    #[validate(length(max = 255))]
    pub company_name: Option<String>,
    #[validate(length(max = 255))]
    pub contact_person: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub position: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    /// Safe to cache on the client as the current user
    pub user: UserInfo,
}

/// Account as returned to clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub role: String,
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub seller_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role.as_str().to_string(),
            company_name: user.profile.company_name,
            contact_person: user.profile.contact_person,
            phone: user.profile.phone,
            position: user.profile.position,
            seller_type: user.profile.seller_type.map(|t| t.as_str().to_string()),
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuSectionDto {
    pub key: String,
    pub path: String,
}

impl From<MenuSection> for MenuSectionDto {
    fn from(section: MenuSection) -> Self {
        Self {
            key: section.key.to_string(),
            path: section.path.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuResponse {
    pub role: String,
    pub sections: Vec<MenuSectionDto>,
}
