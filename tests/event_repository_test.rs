//! Event repository tests: credentials, failure kinds and wire shapes

mod helpers;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use helpers::*;
use volunteer_hub::api::ApiService;
use volunteer_hub::config::ApiConfig;
use volunteer_hub::models::event::{EventDraft, EventStatus};
use volunteer_hub::models::user::{Role, UserProfile};
use volunteer_hub::utils::errors::{ApiError, Operation};
use volunteer_hub::SessionStore;

fn signed_in_session() -> Arc<SessionStore> {
    let session = Arc::new(SessionStore::in_memory());
    session
        .set_session(TEST_TOKEN, &UserProfile::new(TEST_USER_ID, Role::Admin))
        .unwrap();
    session
}

fn api_for(base_url: &str, session: Arc<SessionStore>) -> ApiService {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 1,
        ..ApiConfig::default()
    };
    ApiService::from_config(&config, session).unwrap()
}

#[tokio::test]
async fn test_list_sends_bearer_credential() {
    let mock = EventApiMock::new().await;
    mock.expect_authorized(
        "GET",
        "/events",
        MockResponseConfig::ok(json!([event_json("1", "Blood Donation Camp", 24, "UPCOMING")])),
        1,
    )
    .await;

    let api = api_for(&mock.base_url, signed_in_session());
    let events = api.events.list().await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "1");
    assert_eq!(events[0].status, EventStatus::Upcoming);
    assert_eq!(events[0].capacity, 10);
    assert_eq!(events[0].required_skills, vec!["Organization".to_string()]);
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mock = EventApiMock::new().await;
    mock.mock_list(vec![], MockResponseConfig::default()).await;

    let api = api_for(&format!("{}/", mock.base_url), signed_in_session());
    assert!(api.events.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_credential_sends_nothing() {
    let mock = EventApiMock::new().await;
    mock.mock_list(vec![], MockResponseConfig::default()).await;

    let api = api_for(&mock.base_url, Arc::new(SessionStore::in_memory()));

    assert_matches!(api.events.list().await, Err(ApiError::Unauthenticated));
    assert_matches!(api.events.register("1").await, Err(ApiError::Unauthenticated));
    assert_matches!(api.events.remove("1").await, Err(ApiError::Unauthenticated));
    assert!(mock.server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_closed_port_is_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let api = api_for(&format!("http://127.0.0.1:{}/api", port), signed_in_session());
    assert_matches!(api.events.list().await, Err(ApiError::Unreachable(_)));
}

#[tokio::test]
async fn test_rejection_carries_server_message() {
    let mock = EventApiMock::new().await;
    mock.mock_register("7", MockResponseConfig::rejected(409, "Event is full")).await;

    let api = api_for(&mock.base_url, signed_in_session());
    let err = api.events.register("7").await.unwrap_err();

    assert_matches!(
        err,
        ApiError::Rejected { operation: Operation::Register, status: 409, ref message }
            if message == "Event is full"
    );
    assert_eq!(err.to_string(), "Event is full");
}

#[tokio::test]
async fn test_rejection_reads_error_field_and_plain_text() {
    let mock = EventApiMock::new().await;
    Mock::given(method("DELETE"))
        .and(path(EventApiMock::api_path("/events/1")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "Admins only" })))
        .mount(&mock.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(EventApiMock::api_path("/events/2")))
        .respond_with(ResponseTemplate::new(404).set_body_string("No such event"))
        .mount(&mock.server)
        .await;

    let api = api_for(&mock.base_url, signed_in_session());
    assert_eq!(api.events.remove("1").await.unwrap_err().to_string(), "Admins only");
    assert_eq!(api.events.remove("2").await.unwrap_err().to_string(), "No such event");
}

#[tokio::test]
async fn test_rejection_without_reason_uses_generic_message() {
    let mock = EventApiMock::new().await;
    mock.mock_list(vec![], MockResponseConfig { status: 500, ..Default::default() }).await;
    mock.mock("PATCH", "/events/1/status", MockResponseConfig { status: 502, ..Default::default() })
        .await;

    let api = api_for(&mock.base_url, signed_in_session());
    assert_matches!(
        api.events.list().await,
        Err(ApiError::Rejected { status: 500, ref message, .. }) if message == "Failed to fetch events"
    );
    assert_matches!(
        api.events.set_status("1", EventStatus::Completed).await,
        Err(ApiError::Rejected { ref message, .. }) if message == "Failed to update event status"
    );
}

#[tokio::test]
async fn test_malformed_list_body() {
    let mock = EventApiMock::new().await;
    mock.mock("GET", "/events", MockResponseConfig::ok(json!({ "events": "nope" }))).await;

    let api = api_for(&mock.base_url, signed_in_session());
    assert_matches!(
        api.events.list().await,
        Err(ApiError::Malformed { operation: Operation::ListEvents, .. })
    );
}

#[tokio::test]
async fn test_register_body_variants() {
    let mock = EventApiMock::new().await;
    mock.mock_register(
        "1",
        MockResponseConfig::ok(with_registered(
            event_json("1", "Beach Cleanup", 24, "upcoming"),
            &[TEST_USER_ID],
        )),
    )
    .await;
    mock.mock_register("2", MockResponseConfig::default()).await;
    mock.mock_register("3", MockResponseConfig::ok(json!({ "message": "Registered" }))).await;

    let api = api_for(&mock.base_url, signed_in_session());

    let confirmed = api.events.register("1").await.unwrap().unwrap();
    assert_eq!(confirmed.registered_user_ids, vec![TEST_USER_ID.to_string()]);
    assert!(api.events.register("2").await.unwrap().is_none());
    assert!(api.events.register("3").await.unwrap().is_none());
}

#[tokio::test]
async fn test_status_patch_body() {
    let mock = EventApiMock::new().await;
    Mock::given(method("PATCH"))
        .and(path(EventApiMock::api_path("/events/5/status")))
        .and(body_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("5", "Soup Kitchen", -5, "completed")))
        .expect(1)
        .mount(&mock.server)
        .await;

    let api = api_for(&mock.base_url, signed_in_session());
    let updated = api.events.set_status("5", EventStatus::Completed).await.unwrap();
    assert_eq!(updated.status, EventStatus::Completed);
}

#[tokio::test]
async fn test_create_posts_wire_field_names() {
    let mock = EventApiMock::new().await;
    let start = Utc::now() + Duration::days(2);
    let mut draft = EventDraft::blank(start);
    draft.title = "Food Drive".to_string();
    draft.capacity = 15;
    draft.required_skills = vec!["Cooking".to_string()];
    draft.status = Some(EventStatus::Upcoming);

    Mock::given(method("POST"))
        .and(path(EventApiMock::api_path("/events")))
        .and(wiremock::matchers::body_partial_json(json!({
            "title": "Food Drive",
            "maxVolunteers": 15,
            "skills": ["Cooking"],
            "status": "upcoming"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(event_json("9", "Food Drive", 48, "upcoming")))
        .expect(1)
        .mount(&mock.server)
        .await;

    let api = api_for(&mock.base_url, signed_in_session());
    let created = api.events.create(&draft).await.unwrap();
    assert_eq!(created.id, "9");
}
