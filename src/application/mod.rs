//! Application layer managing state and business workflows.
//!
//! This module sits between the domain and the terminal UI: it validates
//! form input, orchestrates write-through persistence, and tracks which
//! modal is open.

pub mod state;

pub use state::*;
