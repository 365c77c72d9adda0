//! Infrastructure layer providing external service integrations.
//!
//! Local key-value persistence, environment configuration, log file setup,
//! and CSV export.

pub mod persistence;
pub mod config;
pub mod logging;
pub mod export;

pub use persistence::*;
pub use config::*;
pub use logging::*;
pub use export::*;
