//! Geographic coordinates and great-circle distance.

use std::fmt;

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Mean Earth radius used for haversine distances, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 (longitude, latitude) pair in decimal degrees.
///
/// Values are always finite and within range; use [`GeoPoint::new`] to build
/// one from untrusted input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lng: f64,
    lat: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range values.
    pub fn new(lng: f64, lat: f64) -> Result<Self> {
        if !is_valid_lng(lng) || !is_valid_lat(lat) {
            return Err(Error::InvalidCoordinate { lng, lat });
        }
        Ok(Self { lng, lat })
    }

    /// Build a point from a GeoJSON position (`[lng, lat, ...]`).
    ///
    /// Extra members such as altitude are ignored.
    pub fn from_position(position: &[f64]) -> Result<Self> {
        match position {
            [lng, lat, ..] => Self::new(*lng, *lat),
            _ => Err(Error::InvalidCoordinate {
                lng: f64::NAN,
                lat: f64::NAN,
            }),
        }
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self, other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lng, self.lat)
    }
}

impl From<GeoPoint> for geo::Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Coord {
            x: point.lng,
            y: point.lat,
        }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.lng, point.lat)
    }
}

/// Serialized as a GeoJSON position `[lng, lat]`.
impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.lng)?;
        tuple.serialize_element(&self.lat)?;
        tuple.end()
    }
}

pub fn is_valid_lng(lng: f64) -> bool {
    lng.is_finite() && (-180.0..=180.0).contains(&lng)
}

pub fn is_valid_lat(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

/// Haversine distance between two points in meters.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}
