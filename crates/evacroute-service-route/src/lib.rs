//! Hazard-aware evacuation routing HTTP service.
//!
//! # Endpoints
//!
//! - `GET /api/v1/nearest` - nearest evacuation center to a point
//! - `GET /api/v1/nearest-route` - nearest center plus ranked routes to it
//! - `GET /api/v1/route` - ranked routes between two points
//! - `POST /api/v1/admin/events/{kind}/{action}` - toggle a hazard event
//! - `GET /api/v1/hazards/flood`, `GET /api/v1/hazards/earthquake` - raw GeoJSON overlays
//! - `GET /api/v1/hazards/status` - current hazard event flags
//! - `GET /api/v1/hazards/status/stream` - hazard event flags as Server-Sent Events
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live`, `GET /health/ready` - Kubernetes probes

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use evacroute_service_shared::{AppState, MetricsLayer, health_live, health_ready, metrics_handler};

mod handlers;
mod hazards;

pub use hazards::{HAZARD_STATUS_EVENT, snapshot_stream};

/// Build the service router. The Prometheus scrape endpoint is mounted at
/// `metrics_path`.
pub fn router(state: AppState, metrics_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/nearest", get(handlers::nearest))
        .route("/api/v1/nearest-route", get(handlers::nearest_route))
        .route("/api/v1/route", get(handlers::route))
        .route(
            "/api/v1/admin/events/{kind}/{action}",
            post(handlers::toggle_event),
        )
        .route("/api/v1/hazards/flood", get(hazards::flood_zones))
        .route("/api/v1/hazards/earthquake", get(hazards::earthquake_zones))
        .route("/api/v1/hazards/status", get(hazards::status))
        .route("/api/v1/hazards/status/stream", get(hazards::status_stream))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(MetricsLayer)
        .layer(cors)
        .with_state(state)
}
