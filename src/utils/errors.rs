//! Error handling for VolunteerHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Remote operation an API error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    CurrentUser,
    ListEvents,
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    UpdateStatus,
    Register,
}

impl Operation {
    /// Generic failure message used when the server gives no reason
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Login => "Login failed",
            Operation::CurrentUser => "Failed to fetch current user",
            Operation::ListEvents => "Failed to fetch events",
            Operation::CreateEvent => "Failed to create event",
            Operation::UpdateEvent => "Failed to update event",
            Operation::DeleteEvent => "Failed to delete event",
            Operation::UpdateStatus => "Failed to update event status",
            Operation::Register => "Failed to register for event",
        }
    }

    /// Short verb phrase naming the operation
    pub fn describe(&self) -> &'static str {
        match self {
            Operation::Login => "log in",
            Operation::CurrentUser => "fetch the current user",
            Operation::ListEvents => "fetch events",
            Operation::CreateEvent => "create the event",
            Operation::UpdateEvent => "update the event",
            Operation::DeleteEvent => "delete the event",
            Operation::UpdateStatus => "update the event status",
            Operation::Register => "register for the event",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Errors produced by calls against the events API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication token not found")]
    Unauthenticated,

    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// Server answered with a non-success status. `message` is the server's
    /// own reason when it sent one.
    #[error("{message}")]
    Rejected {
        operation: Operation,
        status: u16,
        message: String,
    },

    #[error("Malformed response while trying to {operation}: {reason}")]
    Malformed {
        operation: Operation,
        reason: String,
    },
}

/// Main error type for VolunteerHub application
#[derive(Error, Debug)]
pub enum VolunteerHubError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for VolunteerHub operations
pub type Result<T> = std::result::Result<T, VolunteerHubError>;

/// Result type alias for API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl VolunteerHubError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            VolunteerHubError::Api(ApiError::Unreachable(_)) => true,
            VolunteerHubError::Api(ApiError::Rejected { status, .. }) => *status >= 500,
            VolunteerHubError::Api(_) => false,
            VolunteerHubError::Config(_) => false,
            VolunteerHubError::PermissionDenied(_) => false,
            VolunteerHubError::EventNotFound { .. } => false,
            VolunteerHubError::Storage(_) => true,
            VolunteerHubError::Http(_) => true,
            VolunteerHubError::Serialization(_) => false,
            VolunteerHubError::Io(_) => true,
            VolunteerHubError::UrlParse(_) => false,
            VolunteerHubError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VolunteerHubError::Config(_) => ErrorSeverity::Critical,
            VolunteerHubError::PermissionDenied(_) => ErrorSeverity::Warning,
            VolunteerHubError::Api(ApiError::Unauthenticated) => ErrorSeverity::Warning,
            VolunteerHubError::Api(ApiError::Rejected { .. }) => ErrorSeverity::Warning,
            VolunteerHubError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message suitable for showing to the person using the client
    pub fn user_message(&self) -> String {
        match self {
            VolunteerHubError::Api(ApiError::Unauthenticated) => {
                "Authentication token not found".to_string()
            }
            VolunteerHubError::Api(ApiError::Unreachable(_)) => {
                "Unable to reach the server. Please try again later.".to_string()
            }
            VolunteerHubError::Api(ApiError::Rejected { message, .. }) => message.clone(),
            VolunteerHubError::Api(ApiError::Malformed { operation, .. }) => {
                format!("Unexpected response from the server while trying to {}", operation)
            }
            VolunteerHubError::EventNotFound { .. } => "Event not found".to_string(),
            VolunteerHubError::PermissionDenied(reason) => reason.clone(),
            VolunteerHubError::InvalidInput(reason) => reason.clone(),
            other => other.to_string(),
        }
    }

    /// The API error kind, when this error came from the events API
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            VolunteerHubError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
