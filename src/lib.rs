//! VolunteerHub client
//!
//! Client library for a volunteer event management API. It keeps the signed-in
//! session, talks to the `/events` resource, and maintains an event list
//! view-model with filtering, sorting, optimistic registration and the
//! create/edit round-trip.

pub mod api;
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ApiError, VolunteerHubError, Result};

// Re-export main components for easy access
pub use api::ApiService;
pub use services::ServiceFactory;
pub use state::{EventListViewModel, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
