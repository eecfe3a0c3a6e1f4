//! Nearest-center lookup over a local center list.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use evacroute_lib::{find_nearest, EvacuationCenter, GeoPoint, StaticCenterDirectory};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestReport {
    pub evacuation_center: EvacuationCenter,
    pub distance_meters: f64,
}

/// Handle the nearest subcommand.
pub fn handle_nearest(centers_path: &Path, lat: f64, lng: f64) -> Result<NearestReport> {
    let origin = GeoPoint::new(lng, lat).context("invalid origin")?;
    let directory = StaticCenterDirectory::from_path(centers_path)?;
    debug!(centers = directory.len(), origin = %origin, "resolving nearest center");

    let nearest = find_nearest(origin, directory.centers()).with_context(|| {
        format!(
            "no usable evacuation center in {}",
            centers_path.display()
        )
    })?;

    Ok(NearestReport {
        evacuation_center: nearest.candidate.clone(),
        distance_meters: nearest.distance_meters,
    })
}
