//! Mock events API server for testing
//!
//! This module provides a mock HTTP server that simulates the volunteer
//! events API. It uses wiremock to create configurable mock responses.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const API_PREFIX: &str = "/api";

/// Mock events API server
pub struct EventApiMock {
    pub server: MockServer,
    pub base_url: String,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub status: u16,
    pub delay_ms: Option<u64>,
    pub body: Option<Value>,
    /// Number of times this mock may answer before it stops matching
    pub times: Option<u64>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self {
            status: 200,
            delay_ms: None,
            body: None,
            times: None,
        }
    }
}

impl MockResponseConfig {
    pub fn ok(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Default::default()
        }
    }

    pub fn rejected(status: u16, message: &str) -> Self {
        Self {
            status,
            body: Some(json!({ "message": message })),
            ..Default::default()
        }
    }

    pub fn once(mut self) -> Self {
        self.times = Some(1);
        self
    }

    pub fn delayed(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    fn template(&self) -> ResponseTemplate {
        let mut response = ResponseTemplate::new(self.status);
        if let Some(body) = &self.body {
            response = response.set_body_json(body.clone());
        }
        if let Some(delay) = self.delay_ms {
            response = response.set_delay(Duration::from_millis(delay));
        }
        response
    }
}

impl EventApiMock {
    /// Create a new mock events API server
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let base_url = format!("{}{}", server.uri(), API_PREFIX);

        Self { server, base_url }
    }

    pub fn api_path(resource: &str) -> String {
        format!("{}{}", API_PREFIX, resource)
    }

    /// Mount `config` for `verb` on `resource`, returning nothing
    pub async fn mock(&self, verb: &str, resource: &str, config: MockResponseConfig) {
        let mut mock = Mock::given(method(verb))
            .and(path(Self::api_path(resource)))
            .respond_with(config.template());
        if let Some(times) = config.times {
            mock = mock.up_to_n_times(times);
        }
        mock.mount(&self.server).await;
    }

    /// Mount a mock that must be hit exactly `expected` times with the test credential
    pub async fn expect_authorized(&self, verb: &str, resource: &str, config: MockResponseConfig, expected: u64) {
        Mock::given(method(verb))
            .and(path(Self::api_path(resource)))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(config.template())
            .expect(expected)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_list(&self, events: Vec<Value>, config: MockResponseConfig) {
        let config = MockResponseConfig {
            body: Some(Value::Array(events)),
            ..config
        };
        self.mock("GET", "/events", config).await;
    }

    pub async fn mock_register(&self, event_id: &str, config: MockResponseConfig) {
        self.mock("POST", &format!("/events/{}/register", event_id), config).await;
    }

    pub async fn mock_delete(&self, event_id: &str, config: MockResponseConfig) {
        self.mock("DELETE", &format!("/events/{}", event_id), config).await;
    }

    /// Number of requests received for `verb` on `resource`
    pub async fn count(&self, verb: &str, resource: &str) -> usize {
        let wanted = Self::api_path(resource);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.method.as_str() == verb && request.url.path() == wanted)
            .count()
    }

    pub async fn reset(&self) {
        self.server.reset().await;
    }
}
