//! Presentation layer handling terminal UI and user input.
//!
//! Renders the loan table and its modals with ratatui and maps keyboard
//! input onto [`crate::application::App`] operations.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
