pub mod jwt;
pub mod password;

pub use jwt::{JwtConfig, SessionClaims};
pub use password::PasswordHasher;
