//! Non-persistent storage

mod memory;

pub use memory::{InMemoryRepositoryProvider, InMemoryRequestRepository, InMemoryUserRepository};
