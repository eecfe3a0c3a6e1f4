//! Route planning: fetch alternatives from a provider, then rank them.

use serde::Serialize;
use tracing::{debug, info};

use crate::coords::GeoPoint;
use crate::directions::{DirectionsProvider, TravelMode};
use crate::error::{Error, Result};
use crate::events::HazardEventState;
use crate::hazard::HazardZoneStore;
use crate::ranking::{rank_routes, RankedRoutes, RankingStrategy};

/// A single routing request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteQuery {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub mode: TravelMode,
    pub strategy: RankingStrategy,
    /// Effective flags for this request, overrides already applied.
    pub events: HazardEventState,
}

impl RouteQuery {
    pub fn new(origin: GeoPoint, destination: GeoPoint, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            mode,
            strategy: RankingStrategy::default(),
            events: HazardEventState::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: RankingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_events(mut self, events: HazardEventState) -> Self {
        self.events = events;
        self
    }
}

/// Event flags as echoed back to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EventStatus {
    pub flood: bool,
    pub earthquake: bool,
}

impl From<HazardEventState> for EventStatus {
    fn from(state: HazardEventState) -> Self {
        Self {
            flood: state.flood_active,
            earthquake: state.earthquake_active,
        }
    }
}

/// Ranked routes plus the flags they were ranked under.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub routes: RankedRoutes,
    pub event_status: EventStatus,
}

/// Compute a ranked route plan.
///
/// The provider is called exactly once. Any provider failure fails the whole
/// plan; there is no partial result and no retry.
pub async fn plan_routes(
    provider: &dyn DirectionsProvider,
    store: &HazardZoneStore,
    query: &RouteQuery,
) -> Result<RoutePlan> {
    let paths = provider
        .alternatives(query.origin, query.destination, query.mode)
        .await?;

    if paths.is_empty() {
        return Err(Error::NoCandidatePaths);
    }
    debug!(alternatives = paths.len(), mode = %query.mode, "received candidate paths");

    let routes = rank_routes(query.strategy, store, paths, query.events)?;
    info!(
        strategy = %query.strategy,
        routes = routes.len(),
        flood_active = query.events.flood_active,
        earthquake_active = query.events.earthquake_active,
        "routes ranked"
    );

    Ok(RoutePlan {
        routes,
        event_status: query.events.into(),
    })
}
