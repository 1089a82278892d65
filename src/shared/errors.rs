use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing, expired or rejected credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role does not allow the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Any failure reported by the record store.
    #[error("Store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error was caused by the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DomainError::Store(_))
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<InfraError> for DomainError {
    fn from(err: InfraError) -> Self {
        DomainError::Store(err.to_string())
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(err: sea_orm::DbErr) -> Self {
        InfraError::Database(err).into()
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        InfraError::Serialization(err).into()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Infra(InfraError::Database(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infra_errors_surface_as_store_errors() {
        let err: DomainError = InfraError::Crypto("bad salt".into()).into();
        assert!(matches!(err, DomainError::Store(_)));
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Store error: Crypto error: bad salt");
    }

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = DomainError::not_found("SteelRequest", "id", "abc");
        assert_eq!(err.to_string(), "Not found: SteelRequest with id=abc");
        assert!(err.is_client_error());
    }
}
