//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the VolunteerHub client.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{VolunteerHubError, Result};

/// Initialize logging based on configuration
///
/// Console output goes to stderr so that rendered event lists on stdout stay
/// clean. When `file_path` is set a daily rolling file is written as well; the
/// returned guard must be held for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| VolunteerHubError::Config(format!("Invalid log filter: {}", e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "volunteer-hub.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| VolunteerHubError::Config(format!("Logging already initialized: {}", e)))?;

    debug!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log event management actions
pub fn log_event_action(event_id: &str, action: &str, user_id: Option<&str>, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        details = details,
        "Event action performed"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    warn!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log session changes; the credential itself is never recorded
pub fn log_session_change(action: &str, user_id: Option<&str>, role: Option<&str>) {
    info!(
        action = action,
        user_id = user_id,
        role = role,
        "Session changed"
    );
}
