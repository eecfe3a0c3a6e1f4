//! Structured logging for the evacroute services.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: `json` (default) or `text`/`pretty`
//! - `RUST_LOG`: filter directives (default: `info`)
//! - `SERVICE_NAME`: name recorded in the startup event
//!
//! ```no_run
//! use evacroute_service_shared::logging::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::from_env().with_service("route");
//! init_logging(&config);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines for log shippers.
    #[default]
    Json,
    /// Human-readable multi-line output for local runs.
    Text,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    /// Anything other than `text` or `pretty` selects JSON.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Fallback filter used when `RUST_LOG` is unset or invalid.
    pub level: String,
    pub service: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            service: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self {
            format,
            level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            service: std::env::var("SERVICE_NAME").ok(),
        }
    }

    /// Set the service name unless `SERVICE_NAME` already provided one.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        if self.service.is_none() {
            self.service = Some(service.into());
        }
        self
    }
}

/// Install the global tracing subscriber.
///
/// Call once at startup. A second call is a no-op, which keeps test binaries
/// that share a process from panicking.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init().is_ok(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!(
            service = config.service.as_deref().unwrap_or("evacroute"),
            format = ?config.format,
            "logging initialized"
        );
    }
}
