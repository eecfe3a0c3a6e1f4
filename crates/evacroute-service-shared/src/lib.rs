//! Shared infrastructure for the evacroute HTTP services.
//!
//! This crate provides the HTTP glue every service binary needs:
//!
//! - [`AppState`]: hazard zones, live event flags, the directions provider
//!   and the evacuation center directory, loaded once at startup
//! - [`ServiceConfig`]: environment-driven service configuration
//! - [`health`]: liveness and readiness probe handlers
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ServiceResponse`]: wrapper for successful JSON responses
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: structured JSON logging setup
//! - [`middleware`]: request id propagation and request metrics
//! - Query types with validation for each endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; all routing, scoring and ranking lives in
//! `evacroute-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse query string                                       │
//! │  - Validate parameters                                      │
//! │  - Call evacroute-lib APIs                                  │
//! │  - Format response or Problem Details                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides fixture-backed state and a stub
//! directions provider. Enable the `test-utils` feature to access it from
//! dependent crates.

#![deny(warnings)]

mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ServiceConfig, DEFAULT_CENTERS_PATH, DEFAULT_SERVICE_PORT};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_hazard_event_toggle, record_nearest_resolved,
    record_route_failed, record_routes_ranked, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    failure_reason, from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_NO_CANDIDATES, PROBLEM_ROUTE_NOT_FOUND,
    PROBLEM_SERVICE_UNAVAILABLE, PROBLEM_UNAUTHORIZED, PROBLEM_UPSTREAM_FAILURE,
};
pub use request::{
    EventToggle, EventToggleRequest, NearestParams, NearestQuery, NearestRouteParams,
    NearestRouteQuery, RouteParams, RouteQuery, Validate,
};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError};
