//! API repositories module
//!
//! This module contains the repository clients for the remote resources

pub mod auth;
pub mod event;

// Re-export repositories
pub use auth::AuthRepository;
pub use event::EventRepository;
