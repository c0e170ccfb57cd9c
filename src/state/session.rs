//! Session store
//!
//! Holds the bearer credential and the cached user profile. A single
//! `SessionStore` is created at startup and handed to every component that
//! needs it. Reads never fail: anything unreadable is treated as "no session",
//! since the admin predicate is consulted on every render path.

use tracing::{debug, warn};

use crate::models::user::UserProfile;
use crate::utils::errors::Result;
use crate::utils::logging::log_session_change;
use super::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// In-memory session, not persisted
    pub fn in_memory() -> Self {
        Self::new(Box::new(super::storage::MemoryStore::new()))
    }

    /// Replace the current session. No validation is performed.
    pub fn set_session(&self, credential: &str, profile: &UserProfile) -> Result<()> {
        self.storage.set(TOKEN_KEY, credential)?;
        self.set_profile(profile)?;
        log_session_change("set", Some(&profile.id), Some(&profile.role.to_string()));
        Ok(())
    }

    /// Replace only the cached profile, keeping the credential
    pub fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        let serialized = serde_json::to_string(profile)?;
        self.storage.set(USER_KEY, &serialized)
    }

    /// Remove credential and profile. Safe to call without a session.
    pub fn clear_session(&self) -> Result<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        log_session_change("clear", None, None);
        Ok(())
    }

    pub fn credential(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read credential, treating as signed out");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read stored user");
                return None;
            }
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                debug!(error = %e, "Stored user is malformed, ignoring");
                None
            }
        }
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.current_user().map(|profile| profile.id)
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().map(|profile| profile.is_admin()).unwrap_or(false)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("user_id", &self.current_user_id())
            .finish()
    }
}
