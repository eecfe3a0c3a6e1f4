//! Offline ranking of a saved directions response.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use evacroute_lib::{
    normalize_response, rank_routes, DirectionsResponse, EventStatus, HazardEventState,
    HazardZoneStore, RankedRoutes, RankingStrategy,
};

/// Inputs for [`handle_rank`].
#[derive(Debug, Clone)]
pub struct RankOptions {
    pub directions: PathBuf,
    pub strategy: RankingStrategy,
    pub flood: bool,
    pub earthquake: bool,
    pub flood_hazards: Option<PathBuf>,
    pub earthquake_hazards: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankReport {
    pub strategy: RankingStrategy,
    pub event_status: EventStatus,
    pub routes: RankedRoutes,
}

/// Handle the rank subcommand.
pub fn handle_rank(options: &RankOptions) -> Result<RankReport> {
    let response = read_directions(&options.directions)?;
    let paths = normalize_response(response).with_context(|| {
        format!(
            "directions response {} has no usable routes",
            options.directions.display()
        )
    })?;

    let store = HazardZoneStore::load(
        options.flood_hazards.as_deref(),
        options.earthquake_hazards.as_deref(),
    )?;
    let events = HazardEventState::new(options.flood, options.earthquake);

    let routes = rank_routes(options.strategy, &store, paths, events)?;
    info!(strategy = %options.strategy, routes = routes.len(), "routes ranked");

    Ok(RankReport {
        strategy: options.strategy,
        event_status: events.into(),
        routes,
    })
}

fn read_directions(path: &Path) -> Result<DirectionsResponse> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read directions response {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse directions response {}", path.display()))
}
