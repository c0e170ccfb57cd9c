//! Handlers module
//!
//! This module routes user commands into the services and renders the results

pub mod commands;
pub mod render;

// Re-export main handler functions
pub use commands::{run, Command};
