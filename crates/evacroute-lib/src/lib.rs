//! Evacroute library entry points.
//!
//! This crate loads hazard zone layers, scores candidate evacuation paths
//! against them, ranks alternatives with either ranking strategy, resolves
//! the nearest evacuation center, and fetches alternatives from a directions
//! provider. Higher-level consumers (CLI, HTTP services) should depend on the
//! items exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod candidate;
pub mod coords;
pub mod directions;
pub mod error;
pub mod events;
pub mod facility;
pub mod hazard;
pub mod nearest;
pub mod ranking;
pub mod risk;
pub mod routing;

pub use candidate::RawCandidatePath;
pub use coords::{haversine_distance, GeoPoint};
pub use directions::{
    normalize_response, DirectionsConfig, DirectionsProvider, DirectionsResponse,
    MapboxDirections, TravelMode,
};
pub use error::{Error, Result};
pub use events::{HazardEventSnapshot, HazardEventState, HazardEvents};
pub use facility::{CenterDirectory, EvacuationCenter, StaticCenterDirectory};
pub use hazard::{FloodSeverity, HazardKind, HazardLayer, HazardZone, HazardZoneStore};
pub use nearest::{find_nearest, Located, Nearest};
pub use ranking::{
    rank_routes, PenalizedRoute, RankedRoutes, RankingStrategy, RiskLevel, RiskType, RouteLabel,
    ScoredRoute,
};
pub use risk::{combined_risk, intersection_penalty, path_risk};
pub use routing::{plan_routes, EventStatus, RoutePlan, RouteQuery};
