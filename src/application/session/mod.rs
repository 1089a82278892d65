mod registry;

pub use registry::{Session, SessionRegistry, SharedSessionRegistry};
