//! Test data helpers for creating events, sessions and services

use std::sync::Arc;

use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};

use volunteer_hub::models::user::{Role, UserProfile};
use volunteer_hub::{ServiceFactory, SessionStore, Settings};

use super::api_mock::EventApiMock;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_USER_ID: &str = "user-1";

fn timestamp(offset_hours: i64) -> String {
    (Utc::now() + Duration::hours(offset_hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Event JSON as served by the API. The event starts `start_offset_hours`
/// from now and lasts two hours.
pub fn event_json(id: &str, title: &str, start_offset_hours: i64, status: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": format!("{} description", title),
        "location": "Community Hall",
        "startDate": timestamp(start_offset_hours),
        "endDate": timestamp(start_offset_hours + 2),
        "maxVolunteers": 10,
        "status": status,
        "skills": ["Organization"],
        "registeredVolunteers": []
    })
}

pub fn with_registered(mut event: Value, user_ids: &[&str]) -> Value {
    event["registeredVolunteers"] = json!(user_ids);
    event
}

pub fn with_capacity(mut event: Value, capacity: u32) -> Value {
    event["maxVolunteers"] = json!(capacity);
    event
}

pub fn test_settings(mock: &EventApiMock) -> Settings {
    let mut settings = Settings::default();
    settings.api.base_url = mock.base_url.clone();
    settings.api.timeout_seconds = 1;
    settings.session.allow_bypass = true;
    settings
}

/// Services wired to the mock server with an empty in-memory session
pub fn test_services(mock: &EventApiMock) -> ServiceFactory {
    let session = Arc::new(SessionStore::in_memory());
    ServiceFactory::new(test_settings(mock), session).expect("Failed to build services")
}

/// Services with a signed-in user of the given role
pub fn signed_in_services(mock: &EventApiMock, role: Role) -> ServiceFactory {
    let services = test_services(mock);
    services
        .session
        .set_session(TEST_TOKEN, &UserProfile::new(TEST_USER_ID, role))
        .expect("Failed to set session");
    services
}
