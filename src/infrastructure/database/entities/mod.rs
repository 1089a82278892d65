//! Database entities module

pub mod concrete_request;
pub mod steel_request;
pub mod user;

pub use concrete_request::Entity as ConcreteRequest;
pub use steel_request::Entity as SteelRequest;
pub use user::Entity as User;
