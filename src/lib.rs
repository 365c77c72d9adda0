//! loanbook - Book Loan Tracker Library
//!
//! Record store, write-through persistence, and a terminal UI for tracking
//! book loans.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
