//! Events API module
//!
//! This module handles the HTTP connection and the remote resource clients

pub mod connection;
pub mod repositories;
pub mod service;

// Re-export commonly used API components
pub use connection::ApiConnection;
pub use repositories::{AuthRepository, EventRepository};
pub use service::ApiService;
