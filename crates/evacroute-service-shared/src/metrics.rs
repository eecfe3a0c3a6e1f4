//! Prometheus metrics for the evacroute services.
//!
//! - [`MetricsConfig`] / [`init_metrics`]: install the Prometheus recorder
//! - [`metrics_handler`]: axum handler for the scrape endpoint
//! - `record_*` helpers for routing business metrics
//!
//! ```no_run
//! use evacroute_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//! use axum::{routing::get, Router};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! let app: Router = Router::new().route(&config.path, get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use evacroute_lib::{HazardKind, RankingStrategy};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route the scrape endpoint is mounted on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// - `METRICS_ENABLED`: anything but "false" enables (default: true)
    /// - `METRICS_PATH`: scrape path (default: "/metrics")
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let path = std::env::var("METRICS_PATH")
            .ok()
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Install the Prometheus recorder. Must run before any metric is recorded.
///
/// # Errors
///
/// Fails when metrics are disabled, already installed, or the exporter
/// cannot be built.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Prometheus exposition text, or a comment when the recorder is missing.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

#[derive(Debug, Clone)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// `evacroute_routes_ranked_total{strategy}` plus the
/// `evacroute_route_alternatives` histogram.
pub fn record_routes_ranked(strategy: RankingStrategy, alternatives: usize) {
    metrics::counter!(
        "evacroute_routes_ranked_total",
        "strategy" => strategy.as_str()
    )
    .increment(1);

    metrics::histogram!(
        "evacroute_route_alternatives",
        "strategy" => strategy.as_str()
    )
    .record(alternatives as f64);
}

/// `evacroute_routes_failed_total{reason,endpoint}`.
///
/// `reason` is one of the labels produced by
/// [`failure_reason`](crate::failure_reason).
pub fn record_route_failed(reason: &'static str, endpoint: &'static str) {
    metrics::counter!(
        "evacroute_routes_failed_total",
        "reason" => reason,
        "endpoint" => endpoint
    )
    .increment(1);
}

/// `evacroute_nearest_resolved_total`.
pub fn record_nearest_resolved() {
    metrics::counter!("evacroute_nearest_resolved_total").increment(1);
}

/// `evacroute_hazard_event_toggles_total{kind,active}`.
pub fn record_hazard_event_toggle(kind: HazardKind, active: bool) {
    metrics::counter!(
        "evacroute_hazard_event_toggles_total",
        "kind" => kind.as_str(),
        "active" => if active { "true" } else { "false" }
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_disabled_config_is_rejected() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        assert!(matches!(init_metrics(&config), Err(MetricsError::Disabled)));
    }

    #[tokio::test]
    async fn test_metrics_handler_returns_prometheus_text() {
        let output = metrics_handler().await;
        assert!(output.is_empty() || output.contains('#') || output.contains("evacroute_"));
    }

    // Without an installed recorder these are no-ops; they must not panic.
    #[test]
    fn test_business_metric_helpers() {
        record_routes_ranked(RankingStrategy::RiskThenTime, 3);
        record_routes_ranked(RankingStrategy::TimePlusPenalty, 1);
        record_route_failed("upstream", "route");
        record_route_failed("no_centers", "nearest");
        record_nearest_resolved();
        record_hazard_event_toggle(HazardKind::Flood, true);
        record_hazard_event_toggle(HazardKind::Earthquake, false);
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert_eq!(
            MetricsError::AlreadyInitialized.to_string(),
            "metrics recorder already initialized"
        );
        assert!(MetricsError::InstallFailed("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}
