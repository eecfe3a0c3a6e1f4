//! Application state for the HTTP microservices.
//!
//! Everything a handler needs is reachable from [`AppState`]: the hazard zone
//! store (loaded once, read-only), the live hazard event flags, the directions
//! provider and the evacuation center directory.

use std::sync::Arc;

use evacroute_lib::{
    CenterDirectory, DirectionsProvider, Error as LibError, HazardEvents, HazardKind,
    HazardZoneStore, MapboxDirections, StaticCenterDirectory,
};

use crate::config::ServiceConfig;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to load a hazard zone layer.
    HazardLoad(LibError),

    /// Failed to load the evacuation center list.
    CenterLoad(LibError),

    /// Failed to construct the directions client.
    DirectionsClient(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HazardLoad(e) => write!(f, "failed to load hazard zones: {}", e),
            Self::CenterLoad(e) => write!(f, "failed to load evacuation centers: {}", e),
            Self::DirectionsClient(e) => write!(f, "failed to create directions client: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HazardLoad(e) | Self::CenterLoad(e) | Self::DirectionsClient(e) => Some(e),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheap to clone; share it via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    events: HazardEvents,
}

struct AppStateInner {
    hazards: HazardZoneStore,
    directions: Arc<dyn DirectionsProvider>,
    centers: Arc<dyn CenterDirectory>,
    admin_token: Option<String>,
}

impl AppState {
    /// Load hazard layers and centers from disk and build the provider client.
    pub fn load(config: &ServiceConfig) -> Result<Self, AppStateError> {
        let hazards = HazardZoneStore::load(
            config.flood_hazards_path.as_deref(),
            config.earthquake_hazards_path.as_deref(),
        )
        .map_err(AppStateError::HazardLoad)?;

        let centers = StaticCenterDirectory::from_path(&config.centers_path)
            .map_err(AppStateError::CenterLoad)?;

        if config.directions.access_token.is_empty() {
            tracing::warn!("no directions access token configured; provider requests will likely be rejected");
        }
        let directions = MapboxDirections::new(config.directions.clone())
            .map_err(AppStateError::DirectionsClient)?;

        if config.admin_token.is_none() {
            tracing::warn!("no admin token configured; hazard event toggles are unauthenticated");
        }

        Ok(Self::from_components(
            hazards,
            HazardEvents::default(),
            Arc::new(directions),
            Arc::new(centers),
            config.admin_token.clone(),
        ))
    }

    /// Create application state from pre-built components.
    ///
    /// Useful for tests and for embedding with alternative providers.
    pub fn from_components(
        hazards: HazardZoneStore,
        events: HazardEvents,
        directions: Arc<dyn DirectionsProvider>,
        centers: Arc<dyn CenterDirectory>,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                hazards,
                directions,
                centers,
                admin_token,
            }),
            events,
        }
    }

    pub fn hazards(&self) -> &HazardZoneStore {
        &self.inner.hazards
    }

    /// The live hazard event flags, shared with every clone of this state.
    pub fn events(&self) -> &HazardEvents {
        &self.events
    }

    pub fn directions(&self) -> &dyn DirectionsProvider {
        self.inner.directions.as_ref()
    }

    pub fn centers(&self) -> &dyn CenterDirectory {
        self.inner.centers.as_ref()
    }

    /// The configured admin bearer token, if any.
    pub fn admin_token(&self) -> Option<&str> {
        self.inner.admin_token.as_deref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hazards = self.hazards();
        f.debug_struct("AppState")
            .field("flood_zones", &hazards.layer(HazardKind::Flood).len())
            .field("earthquake_zones", &hazards.layer(HazardKind::Earthquake).len())
            .field("events", &self.events.current())
            .field("admin_token_set", &self.inner.admin_token.is_some())
            .finish()
    }
}
