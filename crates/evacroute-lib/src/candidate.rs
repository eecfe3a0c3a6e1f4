//! Alternative paths as returned by a directions provider.

use serde::{Serialize, Serializer};

use crate::coords::GeoPoint;
use crate::error::{Error, Result};

/// One alternative route for a single request, never persisted.
///
/// Serialized with a GeoJSON `LineString` under `geometry`, plus `distance`
/// (meters) and `duration` (seconds).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawCandidatePath {
    #[serde(rename = "geometry", serialize_with = "serialize_line_string")]
    points: Vec<GeoPoint>,
    #[serde(rename = "distance")]
    distance_meters: f64,
    #[serde(rename = "duration")]
    duration_seconds: f64,
}

impl RawCandidatePath {
    /// Build a path, enforcing at least two points and finite, non-negative
    /// distance and duration.
    pub fn new(points: Vec<GeoPoint>, distance_meters: f64, duration_seconds: f64) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InvalidCandidatePath {
                message: format!("path has {} points, need at least 2", points.len()),
            });
        }
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return Err(Error::InvalidCandidatePath {
                message: format!("distance {distance_meters} is not a non-negative number"),
            });
        }
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(Error::InvalidCandidatePath {
                message: format!("duration {duration_seconds} is not a non-negative number"),
            });
        }

        Ok(Self {
            points,
            distance_meters,
            duration_seconds,
        })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }
}

fn serialize_line_string<S: Serializer>(
    points: &[GeoPoint],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct LineString<'a> {
        #[serde(rename = "type")]
        kind: &'static str,
        coordinates: &'a [GeoPoint],
    }

    LineString {
        kind: "LineString",
        coordinates: points,
    }
    .serialize(serializer)
}
