//! Integration tests for the dialog broker
//!
//! These tests drive requests through a mounted provider and observe the
//! results the way application code and the render layer would.

#[path = "../common/mod.rs"]
pub mod common;

pub mod broker_flow;
pub mod render_flow;
