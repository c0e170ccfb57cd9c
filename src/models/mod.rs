//! Data models module
//!
//! This module contains all data structures exchanged with the events API

pub mod event;
pub mod user;

// Re-export commonly used models
pub use event::{Event, EventDraft, EventStatus, StatusUpdateRequest};
pub use user::{LoginRequest, LoginResponse, Role, UserProfile};
