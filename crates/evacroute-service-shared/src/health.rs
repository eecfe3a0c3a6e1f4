//! Health check handlers for Kubernetes probes.
//!
//! `/health/live` only proves the process is serving; `/health/ready` also
//! reports what was loaded and fails while no evacuation center is known.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use evacroute_lib::HazardKind;

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    pub version: String,

    pub checked_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flood_zones: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub earthquake_zones: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub evacuation_centers: Option<usize>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            checked_at: Utc::now(),
            flood_zones: None,
            earthquake_zones: None,
            evacuation_centers: None,
        }
    }

    /// Ready status with the loaded dataset sizes.
    pub fn ready(
        service: &str,
        version: &str,
        flood_zones: usize,
        earthquake_zones: usize,
        centers: usize,
    ) -> Self {
        Self {
            flood_zones: Some(flood_zones),
            earthquake_zones: Some(earthquake_zones),
            evacuation_centers: Some(centers),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"evacroute-service-shared","version":"0.1.0","checked_at":"..."}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 503 when the center directory cannot be read or is empty, since
/// no nearest-center request could succeed.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let centers = match state.centers().evacuation_centers().await {
        Ok(centers) => centers.len(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check could not read evacuation centers");
            let status = HealthStatus::not_ready(service, version, "center directory unavailable");
            return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
        }
    };

    if centers == 0 {
        let status = HealthStatus::not_ready(service, version, "no evacuation centers loaded");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let hazards = state.hazards();
    let status = HealthStatus::ready(
        service,
        version,
        hazards.layer(HazardKind::Flood).len(),
        hazards.layer(HazardKind::Earthquake).len(),
        centers,
    );
    (StatusCode::OK, Json(status)).into_response()
}
