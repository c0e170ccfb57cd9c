//! API service layer
//!
//! This module bundles the repository clients over one shared connection

use std::sync::Arc;

use crate::api::{ApiConnection, AuthRepository, EventRepository};
use crate::config::ApiConfig;
use crate::state::SessionStore;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct ApiService {
    pub events: EventRepository,
    pub auth: AuthRepository,
}

impl ApiService {
    pub fn new(connection: ApiConnection, session: Arc<SessionStore>) -> Self {
        Self {
            events: EventRepository::new(connection.clone(), session),
            auth: AuthRepository::new(connection),
        }
    }

    /// Build the connection from configuration and wire the repositories
    pub fn from_config(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self> {
        Ok(Self::new(ApiConnection::new(config)?, session))
    }
}
