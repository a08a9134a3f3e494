//! Shared test utilities
//!
//! - Waiting on the dialog store from outside the broker
//! - TUI terminal testing helpers

pub mod store;
pub mod terminal;
