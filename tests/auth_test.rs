//! Authentication flow tests: login, bypass, logout and current-user resolution

mod helpers;

use assert_matches::assert_matches;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use helpers::*;
use volunteer_hub::models::user::{Role, UserProfile};
use volunteer_hub::services::auth::{BYPASS_TOKEN, BYPASS_USER_ID};
use volunteer_hub::{ApiError, VolunteerHubError};

fn signed_token(user_id: &str) -> String {
    encode(
        &Header::default(),
        &json!({ "userId": user_id, "exp": 4_102_444_800u64 }),
        &EncodingKey::from_secret(b"not-the-server-secret"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_login_stores_session_from_nested_user() {
    let mock = EventApiMock::new().await;
    Mock::given(method("POST"))
        .and(path(EventApiMock::api_path("/auth/login")))
        .and(body_json(json!({ "email": "ann@example.org", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "server-token",
            "user": { "_id": "u-ann", "name": "Ann", "email": "ann@example.org", "role": "admin" }
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let services = test_services(&mock);
    let profile = services.auth_service.login("ann@example.org", "hunter2").await.unwrap();

    assert_eq!(profile.id, "u-ann");
    assert!(profile.is_admin());
    assert_eq!(services.session.credential().as_deref(), Some("server-token"));
    assert_eq!(services.session.current_user(), Some(profile));
    assert!(services.session.is_admin());
}

#[tokio::test]
async fn test_login_with_flat_response_defaults_to_volunteer() {
    let mock = EventApiMock::new().await;
    mock.mock(
        "POST",
        "/auth/login",
        MockResponseConfig::ok(json!({ "token": "server-token", "_id": "u-bo", "email": "bo@example.org" })),
    )
    .await;

    let services = test_services(&mock);
    let profile = services.auth_service.login("bo@example.org", "pw").await.unwrap();

    assert_eq!(profile.role, Role::Volunteer);
    assert!(!services.session.is_admin());
    assert_eq!(services.session.current_user_id().as_deref(), Some("u-bo"));
}

#[tokio::test]
async fn test_rejected_login_leaves_session_empty() {
    let mock = EventApiMock::new().await;
    mock.mock("POST", "/auth/login", MockResponseConfig::rejected(401, "Invalid credentials")).await;

    let services = test_services(&mock);
    let err = services.auth_service.login("ann@example.org", "wrong").await.unwrap_err();

    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!services.session.is_authenticated());
}

#[tokio::test]
async fn test_rejected_login_without_reason() {
    let mock = EventApiMock::new().await;
    mock.mock("POST", "/auth/login", MockResponseConfig { status: 401, ..Default::default() }).await;

    let services = test_services(&mock);
    let err = services.auth_service.login("ann@example.org", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), "Login failed");
}

#[tokio::test]
async fn test_login_response_without_user_id_is_malformed() {
    let mock = EventApiMock::new().await;
    mock.mock("POST", "/auth/login", MockResponseConfig::ok(json!({ "token": "server-token" }))).await;

    let services = test_services(&mock);
    assert_matches!(
        services.auth_service.login("ann@example.org", "pw").await,
        Err(VolunteerHubError::Api(ApiError::Malformed { .. }))
    );
    assert!(!services.session.is_authenticated());
}

#[tokio::test]
async fn test_resolve_current_user_from_server() {
    let mock = EventApiMock::new().await;
    mock.expect_authorized(
        "GET",
        "/users/me",
        MockResponseConfig::ok(json!({ "_id": TEST_USER_ID, "name": "Ann", "role": "volunteer" })),
        1,
    )
    .await;

    let services = signed_in_services(&mock, Role::Volunteer);
    let profile = services.auth_service.resolve_current_user().await.unwrap().unwrap();

    assert_eq!(profile.id, TEST_USER_ID);
    assert_eq!(profile.name.as_deref(), Some("Ann"));
    assert_eq!(services.session.current_user().unwrap().name.as_deref(), Some("Ann"));
}

#[tokio::test]
async fn test_resolve_current_user_falls_back_to_credential() {
    let mock = EventApiMock::new().await;
    mock.mock("GET", "/users/me", MockResponseConfig { status: 404, ..Default::default() }).await;

    let services = test_services(&mock);
    services
        .session
        .set_session(&signed_token("jwt-user"), &UserProfile::new("stale-id", Role::Admin))
        .unwrap();

    let profile = services.auth_service.resolve_current_user().await.unwrap().unwrap();

    assert_eq!(profile.id, "jwt-user");
    assert_eq!(profile.role, Role::Admin);
    assert_eq!(services.session.current_user_id().as_deref(), Some("jwt-user"));
}

#[tokio::test]
async fn test_resolve_current_user_without_any_source() {
    let mock = EventApiMock::new().await;
    mock.mock("GET", "/users/me", MockResponseConfig { status: 500, ..Default::default() }).await;

    let services = test_services(&mock);
    assert_eq!(services.auth_service.resolve_current_user().await.unwrap(), None);
    assert_eq!(mock.count("GET", "/users/me").await, 0);

    services
        .session
        .set_session("opaque-token", &UserProfile::new("u1", Role::Volunteer))
        .unwrap();
    let resolved = services.auth_service.resolve_current_user().await.unwrap();
    assert_eq!(resolved, None);
    assert_eq!(mock.count("GET", "/users/me").await, 1);
}

#[tokio::test]
async fn test_bypass_installs_mock_session() {
    let mock = EventApiMock::new().await;
    let services = test_services(&mock);

    let profile = services.auth_service.bypass(Role::Admin).unwrap();

    assert_eq!(profile.id, BYPASS_USER_ID);
    assert_eq!(services.session.credential().as_deref(), Some(BYPASS_TOKEN));
    assert!(services.session.is_admin());
    assert!(mock.server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_bypass_disabled() {
    let mock = EventApiMock::new().await;
    let mut settings = test_settings(&mock);
    settings.session.allow_bypass = false;
    let services = volunteer_hub::ServiceFactory::new(
        settings,
        std::sync::Arc::new(volunteer_hub::SessionStore::in_memory()),
    )
    .unwrap();

    assert_matches!(
        services.auth_service.bypass(Role::Admin),
        Err(VolunteerHubError::PermissionDenied(_))
    );
    assert!(!services.session.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let mock = EventApiMock::new().await;
    let services = signed_in_services(&mock, Role::Admin);

    services.auth_service.logout().unwrap();

    assert!(!services.session.is_authenticated());
    assert_eq!(services.session.current_user(), None);
    assert!(!services.session.is_admin());
}
