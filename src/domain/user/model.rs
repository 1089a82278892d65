use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::DomainError;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    #[default]
    Buyer,
    Seller,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Buyer => "buyer",
            UserRole::Seller => "seller",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buyer" => Ok(UserRole::Buyer),
            "seller" => Ok(UserRole::Seller),
            "admin" => Ok(UserRole::Admin),
            other => Err(DomainError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// What a seller supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellerType {
    Formwork,
    Steel,
}

impl SellerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SellerType::Formwork => "formwork",
            SellerType::Steel => "steel",
        }
    }
}

impl FromStr for SellerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "formwork" => Ok(SellerType::Formwork),
            "steel" => Ok(SellerType::Steel),
            other => Err(DomainError::validation(format!(
                "Unknown seller type '{}'",
                other
            ))),
        }
    }
}

/// Company profile attached to every account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub seller_type: Option<SellerType>,
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name shown on requests: the contact person, else the email's local part.
    pub fn display_contact(&self) -> String {
        self.profile
            .contact_person
            .clone()
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or_default().to_string())
    }
}
