//! Hazard exposure scoring for candidate paths.
//!
//! Two independent measures are provided:
//!
//! - [`path_risk`]: a sampled point-in-polygon sum in abstract risk units,
//!   used by the risk-then-time ranking.
//! - [`intersection_penalty`]: a severity-weighted penalty in seconds derived
//!   from full-line intersection with flood zones, used by the time+penalty
//!   ranking.
//!
//! `path_risk` only inspects roughly [`SAMPLE_TARGET`] points of a path, so a
//! zone that covers only the stretch between two samples goes unnoticed. This
//! keeps scoring cheap for provider geometries with thousands of vertices.

use geo::{Coord, LineString};

use crate::coords::GeoPoint;
use crate::hazard::{FloodSeverity, HazardKind, HazardZoneStore};

/// Risk contributed by a single sampled point inside a hazard zone.
pub const POINT_RISK: f64 = 5.0;

/// Approximate number of points sampled per path.
pub const SAMPLE_TARGET: usize = 50;

/// Weight applied to flood risk in the combined score.
pub const FLOOD_WEIGHT: f64 = 2.0;

/// Weight applied to earthquake risk in the combined score.
pub const EARTHQUAKE_WEIGHT: f64 = 3.0;

/// Risk of a single point for one hazard kind: [`POINT_RISK`] if it lies in
/// any zone of that kind, otherwise zero. Flood severity is ignored here.
pub fn point_risk(store: &HazardZoneStore, kind: HazardKind, point: GeoPoint) -> f64 {
    if store.contains(kind, point) {
        POINT_RISK
    } else {
        0.0
    }
}

/// Stride used to sample a path of `len` points.
pub fn sample_stride(len: usize) -> usize {
    (len / SAMPLE_TARGET).max(1)
}

/// Points visited by [`path_risk`], starting at index 0.
pub fn sampled_points(path: &[GeoPoint]) -> impl Iterator<Item = GeoPoint> + '_ {
    path.iter().step_by(sample_stride(path.len())).copied()
}

/// Sum of [`point_risk`] over the sampled points of `path`.
pub fn path_risk(store: &HazardZoneStore, kind: HazardKind, path: &[GeoPoint]) -> f64 {
    if store.layer(kind).is_empty() {
        return 0.0;
    }
    sampled_points(path)
        .map(|point| point_risk(store, kind, point))
        .sum()
}

/// Weighted combination of the two per-kind risks.
pub fn combined_risk(flood_risk: f64, earthquake_risk: f64) -> f64 {
    flood_risk * FLOOD_WEIGHT + earthquake_risk * EARTHQUAKE_WEIGHT
}

/// Penalty in seconds for crossing a flood zone of the given severity.
pub fn severity_penalty(severity: FloodSeverity) -> f64 {
    match severity {
        FloodSeverity::High => 3000.0,
        FloodSeverity::Medium => 1500.0,
        FloodSeverity::Low => 500.0,
        FloodSeverity::None => 0.0,
    }
}

/// Severity-weighted penalty for every flood zone the full path line touches.
pub fn intersection_penalty(store: &HazardZoneStore, path: &[GeoPoint]) -> f64 {
    let layer = store.layer(HazardKind::Flood);
    if layer.is_empty() || path.is_empty() {
        return 0.0;
    }

    let line = to_line_string(path);
    layer
        .intersecting(&line)
        .map(|zone| severity_penalty(zone.severity.unwrap_or_default()))
        .sum()
}

pub fn to_line_string(path: &[GeoPoint]) -> LineString<f64> {
    LineString::from(path.iter().map(|p| Coord::from(*p)).collect::<Vec<_>>())
}
