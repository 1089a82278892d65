pub mod repositories;
pub mod request;
pub mod user;

// Re-export commonly used types
pub use repositories::RepositoryProvider;
pub use request::{
    ConcreteRequest, RequestKind, RequestRecord, RequestRepository, RequestStatus, StatusCounts,
    SteelRequest,
};
pub use user::{Profile, SellerType, User, UserRepositoryInterface, UserRole};

pub use crate::shared::errors::{DomainError, DomainResult};
