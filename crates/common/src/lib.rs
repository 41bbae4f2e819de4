//! Shared helpers for the workspace: logging setup, environment inspection
//! and small response types used by more than one crate.

pub mod types;
pub mod utils;
pub mod env;
