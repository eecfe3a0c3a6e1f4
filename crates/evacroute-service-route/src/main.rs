//! Evacuation routing HTTP microservice.
//!
//! See the `evacroute_service_route` library for the endpoint list.
//!
//! # Configuration
//!
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `EVACROUTE_FLOOD_HAZARDS_PATH`, `EVACROUTE_EARTHQUAKE_HAZARDS_PATH` - hazard GeoJSON layers
//! - `EVACROUTE_CENTERS_PATH` - evacuation center list
//! - `EVACROUTE_DIRECTIONS_BASE_URL`, `EVACROUTE_DIRECTIONS_TOKEN`,
//!   `EVACROUTE_DIRECTIONS_TIMEOUT_SECS` - directions provider
//! - `EVACROUTE_ADMIN_TOKEN` - bearer token for hazard event toggles
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::net::SocketAddr;

use tracing::{error, info};

use evacroute_lib::HazardKind;
use evacroute_service_route::router;
use evacroute_service_shared::{
    AppState, LoggingConfig, MetricsConfig, ServiceConfig, init_logging, init_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("evacroute-route");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env();
    info!(
        port = config.port,
        centers_path = %config.centers_path.display(),
        directions_base_url = %config.directions.base_url,
        "starting evacuation routing service"
    );

    let state = AppState::load(&config).map_err(|e| {
        error!(error = %e, "failed to load application state");
        e
    })?;

    info!(
        flood_zones = state.hazards().layer(HazardKind::Flood).len(),
        earthquake_zones = state.hazards().layer(HazardKind::Earthquake).len(),
        "application state loaded"
    );

    let app = router(state, &metrics_config.path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
