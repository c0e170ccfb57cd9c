//! Event repository implementation
//!
//! Thin client over the `/events` collection resource. Every call needs a
//! bearer credential from the session store; without one the call fails with
//! `Unauthenticated` before anything is sent.

use std::sync::Arc;

use reqwest::Method;
use tracing::debug;

use crate::api::connection::{read_json, send, ApiConnection};
use crate::models::event::{Event, EventDraft, EventStatus, StatusUpdateRequest};
use crate::state::SessionStore;
use crate::utils::errors::{ApiError, ApiResult, Operation};

#[derive(Clone)]
pub struct EventRepository {
    connection: ApiConnection,
    session: Arc<SessionStore>,
}

impl EventRepository {
    pub fn new(connection: ApiConnection, session: Arc<SessionStore>) -> Self {
        Self { connection, session }
    }

    fn credential(&self) -> ApiResult<String> {
        self.session.credential().ok_or(ApiError::Unauthenticated)
    }

    fn event_path(id: &str) -> String {
        format!("/events/{}", urlencoding::encode(id))
    }

    /// List all events
    pub async fn list(&self) -> ApiResult<Vec<Event>> {
        let credential = self.credential()?;
        let request = self.connection.authorized(Method::GET, "/events", &credential);
        let response = send(request, Operation::ListEvents).await?;
        let events: Vec<Event> = read_json(response, Operation::ListEvents).await?;
        debug!(count = events.len(), "Fetched events");
        Ok(events)
    }

    /// Create an event; the server assigns the id
    pub async fn create(&self, draft: &EventDraft) -> ApiResult<Event> {
        let credential = self.credential()?;
        let request = self
            .connection
            .authorized(Method::POST, "/events", &credential)
            .json(draft);
        let response = send(request, Operation::CreateEvent).await?;
        read_json(response, Operation::CreateEvent).await
    }

    /// Replace an event with the full draft
    pub async fn update(&self, id: &str, draft: &EventDraft) -> ApiResult<Event> {
        let credential = self.credential()?;
        let request = self
            .connection
            .authorized(Method::PUT, &Self::event_path(id), &credential)
            .json(draft);
        let response = send(request, Operation::UpdateEvent).await?;
        read_json(response, Operation::UpdateEvent).await
    }

    /// Delete an event. Deleting an id the server no longer knows is reported
    /// as `Rejected`, not ignored.
    pub async fn remove(&self, id: &str) -> ApiResult<()> {
        let credential = self.credential()?;
        let request = self
            .connection
            .authorized(Method::DELETE, &Self::event_path(id), &credential);
        send(request, Operation::DeleteEvent).await?;
        Ok(())
    }

    /// Change only the status of an event
    pub async fn set_status(&self, id: &str, status: EventStatus) -> ApiResult<Event> {
        let credential = self.credential()?;
        let path = format!("{}/status", Self::event_path(id));
        let request = self
            .connection
            .authorized(Method::PATCH, &path, &credential)
            .json(&StatusUpdateRequest { status });
        let response = send(request, Operation::UpdateStatus).await?;
        read_json(response, Operation::UpdateStatus).await
    }

    /// Register the signed-in user for an event.
    ///
    /// Capacity and duplicate checks are the server's; its rejection reason
    /// comes back verbatim in `ApiError::Rejected`. The updated event is
    /// returned when the success body carries one.
    pub async fn register(&self, id: &str) -> ApiResult<Option<Event>> {
        let credential = self.credential()?;
        let path = format!("{}/register", Self::event_path(id));
        let request = self
            .connection
            .authorized(Method::POST, &path, &credential)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        let response = send(request, Operation::Register).await?;

        let body = response.text().await.unwrap_or_default();
        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Event>(&body) {
            Ok(event) => Ok(Some(event)),
            Err(e) => {
                debug!(event_id = id, error = %e, "Registration response carried no event");
                Ok(None)
            }
        }
    }
}
