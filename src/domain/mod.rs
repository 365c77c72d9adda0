//! Domain layer: loan records, the record store, and form validation.

pub mod models;
pub mod store;
pub mod services;
pub mod errors;

pub use models::*;
pub use store::*;
pub use services::*;
pub use errors::*;
