//! Bearer tokens carrying the session id

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::InfraError;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-before-deploying".to_string(),
            expiration_hours: 24,
            issuer: "b2bsteel".to_string(),
        }
    }
}

/// Claims of a session token.
///
/// The role is informational only; access checks re-read it from the store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Session id, must still be live in the session registry
    pub sid: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl SessionClaims {
    pub fn new(user_id: &str, email: &str, role: &str, session_id: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            sid: session_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

pub fn create_token(claims: &SessionClaims, config: &JwtConfig) -> Result<String, InfraError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| InfraError::Crypto(e.to_string()))
}

/// Checks signature, expiry and issuer.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<SessionClaims, InfraError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| InfraError::Crypto(e.to_string()))
}
