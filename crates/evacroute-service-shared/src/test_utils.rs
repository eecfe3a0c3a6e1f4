//! Test utilities for handler testing.
//!
//! Builds an [`AppState`] from the fixture hazard layers and center list,
//! wired to a [`StubDirections`] provider so no test touches the network.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use evacroute_lib::{
    normalize_response, DirectionsProvider, DirectionsResponse, Error as LibError, GeoPoint,
    HazardEvents, HazardZoneStore, RawCandidatePath, StaticCenterDirectory, TravelMode,
};

use crate::state::AppState;

/// Admin token configured on [`test_state`].
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// What a [`StubDirections`] answers with.
#[derive(Debug, Clone)]
pub enum StubReply {
    Paths(Vec<RawCandidatePath>),
    Empty,
    Failure(String),
}

/// Canned directions provider that records how it was called.
#[derive(Debug)]
pub struct StubDirections {
    reply: StubReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<(GeoPoint, GeoPoint, TravelMode)>>,
}

impl StubDirections {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Replies with the three routes of the saved provider response.
    pub fn with_fixture_routes() -> Self {
        Self::new(StubReply::Paths(fixture_paths()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(GeoPoint, GeoPoint, TravelMode)> {
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DirectionsProvider for StubDirections {
    async fn alternatives(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        mode: TravelMode,
    ) -> evacroute_lib::Result<Vec<RawCandidatePath>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) =
            Some((origin, destination, mode));

        match &self.reply {
            StubReply::Paths(paths) => Ok(paths.clone()),
            StubReply::Empty => Err(LibError::NoCandidatePaths),
            StubReply::Failure(message) => Err(LibError::routing_failed(message.clone())),
        }
    }
}

/// The saved provider response, normalized.
///
/// # Panics
///
/// Panics if the fixture is missing or malformed.
pub fn fixture_paths() -> Vec<RawCandidatePath> {
    let path = fixtures_dir().join("directions_response.json");
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    let response: DirectionsResponse =
        serde_json::from_str(&text).unwrap_or_else(|e| panic!("invalid fixture response: {}", e));
    normalize_response(response).unwrap_or_else(|e| panic!("fixture routes rejected: {}", e))
}

/// Both fixture hazard layers.
///
/// # Panics
///
/// Panics if the fixture layers cannot be loaded.
pub fn fixture_hazards() -> HazardZoneStore {
    let dir = fixtures_dir();
    HazardZoneStore::load(
        Some(dir.join("flood_zones.geojson").as_path()),
        Some(dir.join("earthquake_zones.geojson").as_path()),
    )
    .unwrap_or_else(|e| panic!("failed to load fixture hazards: {}", e))
}

/// The fixture center list (one entry has no coordinates).
///
/// # Panics
///
/// Panics if the fixture cannot be loaded.
pub fn fixture_centers() -> StaticCenterDirectory {
    StaticCenterDirectory::from_path(&fixtures_dir().join("evacuation_centers.json"))
        .unwrap_or_else(|e| panic!("failed to load fixture centers: {}", e))
}

/// Fixture state answering every directions request with the fixture routes.
pub fn test_state() -> AppState {
    test_state_with(
        Arc::new(StubDirections::with_fixture_routes()),
        fixture_centers(),
    )
}

/// Fixture state with a caller-supplied provider and center list.
pub fn test_state_with(
    directions: Arc<StubDirections>,
    centers: StaticCenterDirectory,
) -> AppState {
    AppState::from_components(
        fixture_hazards(),
        HazardEvents::default(),
        directions,
        Arc::new(centers),
        Some(TEST_ADMIN_TOKEN.to_string()),
    )
}
