pub mod errors;
pub mod pagination;
pub mod shutdown;
pub mod time;
pub mod validations;

pub use errors::*;
pub use pagination::*;
pub use time::*;
pub use validations::*;
