//! State management module
//!
//! This module holds the client-side state: the persisted session and the
//! event list view-model with its filter/sort projection

pub mod event_list;
pub mod projection;
pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use event_list::{DraftMode, DraftState, EventListViewModel};
pub use projection::{FilterOption, SortOption};
pub use session::SessionStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
