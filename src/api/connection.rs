//! HTTP connection to the events API
//!
//! Builds the shared `reqwest` client and turns transport outcomes into
//! `ApiError` kinds: no response at all is `Unreachable`, a non-success
//! status is `Rejected` (carrying the server's message when it sent one), and
//! an unreadable body is `Malformed`.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::utils::errors::{ApiError, ApiResult, Operation, VolunteerHubError, Result};
use crate::utils::logging::log_api_error;

/// Shared HTTP client plus the API base URL
#[derive(Debug, Clone)]
pub struct ApiConnection {
    client: Client,
    base_url: String,
}

/// Error body shapes the API is known to send
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiConnection {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(VolunteerHubError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/events`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Same as `request` with the bearer credential attached
    pub fn authorized(&self, method: Method, path: &str, credential: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(credential)
    }
}

/// Send a request, mapping transport failures and non-success statuses
pub async fn send(builder: RequestBuilder, operation: Operation) -> ApiResult<Response> {
    let response = builder.send().await.map_err(|e| {
        log_api_error("events", &e.to_string(), Some(operation.describe()));
        ApiError::Unreachable(e.to_string())
    })?;

    let status = response.status();
    if status.is_success() {
        debug!(operation = %operation, status = status.as_u16(), "API call succeeded");
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body).unwrap_or_else(|| operation.failure_message().to_string());
    warn!(operation = %operation, status = status.as_u16(), message = %message, "API call rejected");

    Err(ApiError::Rejected {
        operation,
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body into `T`
pub async fn read_json<T: DeserializeOwned>(response: Response, operation: Operation) -> ApiResult<T> {
    let body = response.text().await.map_err(|e| ApiError::Malformed {
        operation,
        reason: e.to_string(),
    })?;

    serde_json::from_str(&body).map_err(|e| {
        warn!(operation = %operation, error = %e, "Unexpected response body");
        ApiError::Malformed {
            operation,
            reason: e.to_string(),
        }
    })
}

/// Reason text from an error body, if the server sent one
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(parsed) => {
            let present = |m: &String| !m.trim().is_empty();
            parsed.message.filter(present).or(parsed.error.filter(present))
        }
        // plain-text bodies are passed through, HTML error pages are not
        Err(_) if !trimmed.starts_with('<') && !trimmed.starts_with('{') => Some(trimmed.to_string()),
        Err(_) => None,
    }
}
