//! Services module
//!
//! This module contains business logic services and the factory wiring them
//! to the API and the session

pub mod auth;

// Re-export commonly used services
pub use auth::AuthService;

use std::sync::Arc;

use crate::api::ApiService;
use crate::config::settings::Settings;
use crate::state::{EventListViewModel, SessionStore};
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub api: ApiService,
    pub auth_service: AuthService,
    pub session: Arc<SessionStore>,
    settings: Settings,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, session: Arc<SessionStore>) -> Result<Self> {
        let api = ApiService::from_config(&settings.api, session.clone())?;
        let auth_service = AuthService::new(
            api.auth.clone(),
            session.clone(),
            settings.session.allow_bypass,
        );

        Ok(Self {
            api,
            auth_service,
            session,
            settings,
        })
    }

    /// A fresh event list view-model bound to this session
    pub fn event_list(&self) -> EventListViewModel {
        EventListViewModel::new(self.api.events.clone(), self.session.clone())
            .with_capacity_check(self.settings.features.client_capacity_check)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
