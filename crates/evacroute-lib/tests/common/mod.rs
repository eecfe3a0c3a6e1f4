//! Shared fixture helpers for integration tests.

use std::fs;
use std::path::PathBuf;

use evacroute_lib::{
    normalize_response, DirectionsResponse, GeoPoint, HazardZoneStore, RawCandidatePath,
};

/// Path to the shared fixtures directory (hazard layers, centers, saved
/// provider responses).
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Both fixture hazard layers.
#[allow(dead_code)]
pub fn fixture_store() -> HazardZoneStore {
    let dir = fixtures_dir();
    HazardZoneStore::load(
        Some(dir.join("flood_zones.geojson").as_path()),
        Some(dir.join("earthquake_zones.geojson").as_path()),
    )
    .expect("fixture hazard layers load")
}

/// Candidate paths from the saved provider response, in provider order:
/// 500 s through the riverbank flood zone, then 600 s and 700 s clear
/// detours.
#[allow(dead_code)]
pub fn fixture_paths() -> Vec<RawCandidatePath> {
    let text = fs::read_to_string(fixtures_dir().join("directions_response.json"))
        .expect("read fixture directions response");
    let response: DirectionsResponse =
        serde_json::from_str(&text).expect("parse fixture directions response");
    normalize_response(response).expect("fixture routes are valid")
}

#[allow(dead_code)]
pub fn point(lng: f64, lat: f64) -> GeoPoint {
    GeoPoint::new(lng, lat).expect("valid test coordinate")
}
