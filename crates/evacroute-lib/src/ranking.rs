//! Ranking of alternative paths for one routing request.
//!
//! Two strategies coexist and serve different endpoints:
//!
//! - [`RankingStrategy::RiskThenTime`]: sampled flood/earthquake risk is
//!   combined into one score; paths are ordered by that score, then by
//!   duration, and labeled safest/fastest/alternate.
//! - [`RankingStrategy::TimePlusPenalty`]: a severity-weighted flood penalty
//!   (seconds) is added to the duration and paths are ordered by the sum.
//!
//! The two orderings can disagree for the same input.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidate::RawCandidatePath;
use crate::error::{Error, Result};
use crate::events::HazardEventState;
use crate::hazard::{HazardKind, HazardZoneStore};
use crate::risk::{combined_risk, intersection_penalty, path_risk};

/// Combined risk at or above which a path is classified `high`.
pub const HIGH_RISK_THRESHOLD: f64 = 8.0;

/// Selects which ordering to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingStrategy {
    #[default]
    RiskThenTime,
    TimePlusPenalty,
}

impl RankingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingStrategy::RiskThenTime => "risk-then-time",
            RankingStrategy::TimePlusPenalty => "time-plus-penalty",
        }
    }
}

impl fmt::Display for RankingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a path relative to the other alternatives of the same request.
///
/// Several paths may share a label when they tie on a minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteLabel {
    #[serde(rename = "safest & fastest")]
    SafestAndFastest,
    #[serde(rename = "safest")]
    Safest,
    #[serde(rename = "fastest")]
    Fastest,
    #[serde(rename = "alternate")]
    Alternate,
}

impl RouteLabel {
    fn classify(is_safest: bool, is_fastest: bool) -> Self {
        match (is_safest, is_fastest) {
            (true, true) => RouteLabel::SafestAndFastest,
            (true, false) => RouteLabel::Safest,
            (false, true) => RouteLabel::Fastest,
            (false, false) => RouteLabel::Alternate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    fn classify(combined_risk: f64) -> Self {
        if combined_risk == 0.0 {
            RiskLevel::Low
        } else if combined_risk < HIGH_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// Dominant hazard on a path. Flood wins ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskType {
    None,
    Flood,
    Earthquake,
}

impl RiskType {
    fn classify(flood_risk: f64, earthquake_risk: f64, combined_risk: f64) -> Self {
        if combined_risk == 0.0 {
            RiskType::None
        } else if earthquake_risk > flood_risk {
            RiskType::Earthquake
        } else {
            RiskType::Flood
        }
    }
}

/// A path ranked by [`RankingStrategy::RiskThenTime`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRoute {
    #[serde(flatten)]
    pub path: RawCandidatePath,
    pub flood_risk: f64,
    pub earthquake_risk: f64,
    pub combined_risk: f64,
    pub label: RouteLabel,
    pub risk_level: RiskLevel,
    pub risk_type: RiskType,
    pub is_default: bool,
}

/// A path ranked by [`RankingStrategy::TimePlusPenalty`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenalizedRoute {
    #[serde(flatten)]
    pub path: RawCandidatePath,
    pub hazard_penalty: f64,
    pub final_score: f64,
    pub is_default: bool,
}

/// Output of [`rank_routes`]; serializes as a plain array of routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RankedRoutes {
    RiskThenTime(Vec<ScoredRoute>),
    TimePlusPenalty(Vec<PenalizedRoute>),
}

impl RankedRoutes {
    pub fn strategy(&self) -> RankingStrategy {
        match self {
            RankedRoutes::RiskThenTime(_) => RankingStrategy::RiskThenTime,
            RankedRoutes::TimePlusPenalty(_) => RankingStrategy::TimePlusPenalty,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RankedRoutes::RiskThenTime(routes) => routes.len(),
            RankedRoutes::TimePlusPenalty(routes) => routes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The path marked as default (index 0).
    pub fn default_path(&self) -> Option<&RawCandidatePath> {
        match self {
            RankedRoutes::RiskThenTime(routes) => routes.first().map(|r| &r.path),
            RankedRoutes::TimePlusPenalty(routes) => routes.first().map(|r| &r.path),
        }
    }
}

/// Rank `paths` with the given strategy.
pub fn rank_routes(
    strategy: RankingStrategy,
    store: &HazardZoneStore,
    paths: Vec<RawCandidatePath>,
    events: HazardEventState,
) -> Result<RankedRoutes> {
    match strategy {
        RankingStrategy::RiskThenTime => {
            rank_by_risk_then_time(store, paths, events).map(RankedRoutes::RiskThenTime)
        }
        RankingStrategy::TimePlusPenalty => {
            rank_by_time_plus_penalty(store, paths, events).map(RankedRoutes::TimePlusPenalty)
        }
    }
}

/// Order by combined risk, then duration; label and classify each path.
///
/// Only hazards active in `events` contribute risk. The sort is stable, so
/// paths with identical risk and duration keep their provider order.
pub fn rank_by_risk_then_time(
    store: &HazardZoneStore,
    paths: Vec<RawCandidatePath>,
    events: HazardEventState,
) -> Result<Vec<ScoredRoute>> {
    if paths.is_empty() {
        return Err(Error::NoCandidatePaths);
    }

    let mut routes: Vec<ScoredRoute> = paths
        .into_iter()
        .map(|path| score_path(store, path, events))
        .collect();

    routes.sort_by(compare_risk_then_time);

    let fastest = min_of(routes.iter().map(|r| r.path.duration_seconds()));
    let lowest_risk = min_of(routes.iter().map(|r| r.combined_risk));

    for (index, route) in routes.iter_mut().enumerate() {
        route.label = RouteLabel::classify(
            route.combined_risk == lowest_risk,
            route.path.duration_seconds() == fastest,
        );
        route.is_default = index == 0;
    }

    Ok(routes)
}

/// Order by `duration + flood intersection penalty`.
///
/// The penalty is only accrued while a flood event is active; the earthquake
/// flag has no effect on this strategy.
pub fn rank_by_time_plus_penalty(
    store: &HazardZoneStore,
    paths: Vec<RawCandidatePath>,
    events: HazardEventState,
) -> Result<Vec<PenalizedRoute>> {
    if paths.is_empty() {
        return Err(Error::NoCandidatePaths);
    }

    let mut routes: Vec<PenalizedRoute> = paths
        .into_iter()
        .map(|path| {
            let hazard_penalty = if events.flood_active {
                intersection_penalty(store, path.points())
            } else {
                0.0
            };
            let final_score = path.duration_seconds() + hazard_penalty;
            PenalizedRoute {
                path,
                hazard_penalty,
                final_score,
                is_default: false,
            }
        })
        .collect();

    routes.sort_by(|a, b| a.final_score.total_cmp(&b.final_score));
    if let Some(first) = routes.first_mut() {
        first.is_default = true;
    }

    Ok(routes)
}

fn score_path(store: &HazardZoneStore, path: RawCandidatePath, events: HazardEventState) -> ScoredRoute {
    let flood_risk = if events.flood_active {
        path_risk(store, HazardKind::Flood, path.points())
    } else {
        0.0
    };
    let earthquake_risk = if events.earthquake_active {
        path_risk(store, HazardKind::Earthquake, path.points())
    } else {
        0.0
    };
    let combined = combined_risk(flood_risk, earthquake_risk);

    debug!(
        points = path.points().len(),
        duration = path.duration_seconds(),
        flood_risk,
        earthquake_risk,
        combined_risk = combined,
        "scored candidate path"
    );

    ScoredRoute {
        path,
        flood_risk,
        earthquake_risk,
        combined_risk: combined,
        label: RouteLabel::Alternate,
        risk_level: RiskLevel::classify(combined),
        risk_type: RiskType::classify(flood_risk, earthquake_risk, combined),
        is_default: false,
    }
}

fn compare_risk_then_time(a: &ScoredRoute, b: &ScoredRoute) -> Ordering {
    a.combined_risk
        .total_cmp(&b.combined_risk)
        .then_with(|| a.path.duration_seconds().total_cmp(&b.path.duration_seconds()))
}

fn min_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::INFINITY, f64::min)
}
