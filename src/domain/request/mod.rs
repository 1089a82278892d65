mod dto;
pub mod model;
pub mod repository;
pub mod status;

pub use dto::*;
pub use model::*;
pub use repository::RequestRepository;
pub use status::{counts_as_pending, RequestStatus};
