//! Query parameter types and validation for HTTP endpoints.
//!
//! Every numeric parameter arrives as a string and is parsed explicitly, so
//! `NaN`, `inf`, empty strings and out-of-range values are rejected with a
//! 400 instead of leaking into the scoring engine.

use serde::{Deserialize, Serialize};

use evacroute_lib::coords::{is_valid_lat, is_valid_lng};
use evacroute_lib::{GeoPoint, HazardKind, TravelMode};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations check every field and convert the raw request into typed
/// parameters, or return a `ProblemDetails` for invalid input.
pub trait Validate {
    /// Typed parameters produced by a successful validation.
    type Output;

    /// Validate the request. `request_id` populates the `instance` field of
    /// any returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<Self::Output, Box<ProblemDetails>>;
}

/// `GET /api/v1/nearest` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestParams {
    pub origin: GeoPoint,
    pub mode: TravelMode,
}

impl Validate for NearestQuery {
    type Output = NearestParams;

    fn validate(&self, request_id: &str) -> Result<NearestParams, Box<ProblemDetails>> {
        Ok(NearestParams {
            origin: parse_point(("lng", &self.lng), ("lat", &self.lat), request_id)?,
            mode: parse_mode(&self.mode, request_id)?,
        })
    }
}

/// `GET /api/v1/nearest-route` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestRouteQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub mode: Option<String>,
    pub test_flood: Option<String>,
    pub test_earthquake: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestRouteParams {
    pub origin: GeoPoint,
    pub mode: TravelMode,
    pub force_flood: bool,
    pub force_earthquake: bool,
}

impl Validate for NearestRouteQuery {
    type Output = NearestRouteParams;

    fn validate(&self, request_id: &str) -> Result<NearestRouteParams, Box<ProblemDetails>> {
        Ok(NearestRouteParams {
            origin: parse_point(("lng", &self.lng), ("lat", &self.lat), request_id)?,
            mode: parse_mode(&self.mode, request_id)?,
            force_flood: is_forced(&self.test_flood),
            force_earthquake: is_forced(&self.test_earthquake),
        })
    }
}

/// `GET /api/v1/route` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    pub origin_lat: Option<String>,
    pub origin_lng: Option<String>,
    pub dest_lat: Option<String>,
    pub dest_lng: Option<String>,
    pub mode: Option<String>,
    pub test_flood: Option<String>,
    pub test_earthquake: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteParams {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub mode: TravelMode,
    pub force_flood: bool,
    pub force_earthquake: bool,
}

impl Validate for RouteQuery {
    type Output = RouteParams;

    fn validate(&self, request_id: &str) -> Result<RouteParams, Box<ProblemDetails>> {
        Ok(RouteParams {
            origin: parse_point(
                ("originLng", &self.origin_lng),
                ("originLat", &self.origin_lat),
                request_id,
            )?,
            destination: parse_point(
                ("destLng", &self.dest_lng),
                ("destLat", &self.dest_lat),
                request_id,
            )?,
            mode: parse_mode(&self.mode, request_id)?,
            force_flood: is_forced(&self.test_flood),
            force_earthquake: is_forced(&self.test_earthquake),
        })
    }
}

/// Path segments of `POST /api/v1/admin/events/{kind}/{action}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventToggleRequest {
    pub kind: String,
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventToggle {
    pub kind: HazardKind,
    pub active: bool,
}

impl Validate for EventToggleRequest {
    type Output = EventToggle;

    fn validate(&self, request_id: &str) -> Result<EventToggle, Box<ProblemDetails>> {
        let kind = self.kind.parse::<HazardKind>().map_err(|_| {
            Box::new(ProblemDetails::bad_request(
                format!(
                    "Unknown hazard kind '{}'; expected 'flood' or 'earthquake'",
                    self.kind
                ),
                request_id,
            ))
        })?;

        let active = match self.action.as_str() {
            "enable" => true,
            "disable" => false,
            other => {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!("Unknown action '{}'; expected 'enable' or 'disable'", other),
                    request_id,
                )))
            }
        };

        Ok(EventToggle { kind, active })
    }
}

/// Only the exact string `"true"` forces a hazard on.
fn is_forced(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

fn parse_mode(value: &Option<String>, request_id: &str) -> Result<TravelMode, Box<ProblemDetails>> {
    let raw = value.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(Box::new(ProblemDetails::bad_request(
            "The 'mode' parameter is required (walking, driving or two-wheeler)",
            request_id,
        )));
    }
    raw.parse::<TravelMode>()
        .map_err(|e| Box::new(ProblemDetails::bad_request(e.to_string(), request_id)))
}

fn parse_number(
    name: &str,
    value: &Option<String>,
    request_id: &str,
) -> Result<f64, Box<ProblemDetails>> {
    let raw = value.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' parameter is required", name),
            request_id,
        )));
    }

    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' parameter must be a finite number, got '{}'", name, raw),
            request_id,
        ))),
    }
}

fn parse_point(
    lng: (&str, &Option<String>),
    lat: (&str, &Option<String>),
    request_id: &str,
) -> Result<GeoPoint, Box<ProblemDetails>> {
    let lng_value = parse_number(lng.0, lng.1, request_id)?;
    let lat_value = parse_number(lat.0, lat.1, request_id)?;

    if !is_valid_lng(lng_value) {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' parameter must be between -180 and 180", lng.0),
            request_id,
        )));
    }
    if !is_valid_lat(lat_value) {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' parameter must be between -90 and 90", lat.0),
            request_id,
        )));
    }

    GeoPoint::new(lng_value, lat_value)
        .map_err(|e| Box::new(ProblemDetails::bad_request(e.to_string(), request_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn nearest(lat: &str, lng: &str, mode: &str) -> NearestQuery {
        NearestQuery {
            lat: some(lat),
            lng: some(lng),
            mode: some(mode),
        }
    }

    #[test]
    fn test_nearest_query_valid() {
        let params = nearest("14.65", "121.10", "walking").validate("test").unwrap();
        assert_eq!(params.origin.lat(), 14.65);
        assert_eq!(params.origin.lng(), 121.10);
        assert_eq!(params.mode, TravelMode::Walking);
    }

    #[test]
    fn test_zero_coordinates_are_valid() {
        let params = nearest("0", "0", "driving").validate("test").unwrap();
        assert_eq!(params.origin.lat(), 0.0);
        assert_eq!(params.origin.lng(), 0.0);
    }

    #[test]
    fn test_non_finite_and_garbage_rejected() {
        for bad in ["NaN", "inf", "-infinity", "abc", "", "  "] {
            let err = nearest(bad, "121.1", "walking").validate("test").unwrap_err();
            assert!(
                err.detail.as_deref().unwrap().contains("'lat'"),
                "expected rejection for {bad:?}"
            );
            assert_eq!(err.status, 400);
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = nearest("91", "121.1", "walking").validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("between -90 and 90"));

        let err = nearest("14.6", "-180.5", "walking").validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("between -180 and 180"));
    }

    #[test]
    fn test_mode_required_and_checked() {
        let mut query = nearest("14.6", "121.1", "walking");
        query.mode = None;
        let err = query.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'mode'"));

        let err = nearest("14.6", "121.1", "helicopter").validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("helicopter"));
    }

    #[test]
    fn test_only_literal_true_forces_hazard() {
        let mut query = NearestRouteQuery {
            lat: some("14.6"),
            lng: some("121.1"),
            mode: some("two-wheeler"),
            test_flood: some("true"),
            test_earthquake: some("TRUE"),
        };
        let params = query.validate("test").unwrap();
        assert!(params.force_flood);
        assert!(!params.force_earthquake);

        query.test_flood = some("1");
        assert!(!query.validate("test").unwrap().force_flood);
    }

    #[test]
    fn test_route_query_names_failing_parameter() {
        let query = RouteQuery {
            origin_lat: some("14.6"),
            origin_lng: some("121.1"),
            dest_lat: some("14.7"),
            dest_lng: None,
            mode: some("walking"),
            ..RouteQuery::default()
        };
        let err = query.validate("req-9").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'destLng'"));
        assert_eq!(err.instance.as_deref(), Some("req-9"));
    }

    #[test]
    fn test_route_query_deserializes_camel_case() {
        let query: RouteQuery = serde_json::from_str(
            r#"{"originLat":"14.6","originLng":"121.1","destLat":"14.7","destLng":"121.2","mode":"driving","testFlood":"true"}"#,
        )
        .unwrap();
        let params = query.validate("test").unwrap();
        assert_eq!(params.destination.lng(), 121.2);
        assert!(params.force_flood);
        assert!(!params.force_earthquake);
    }

    #[test]
    fn test_event_toggle_parsing() {
        let toggle = EventToggleRequest {
            kind: "flood".into(),
            action: "enable".into(),
        }
        .validate("test")
        .unwrap();
        assert_eq!(toggle, EventToggle { kind: HazardKind::Flood, active: true });

        let err = EventToggleRequest {
            kind: "tsunami".into(),
            action: "enable".into(),
        }
        .validate("test")
        .unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("tsunami"));

        let err = EventToggleRequest {
            kind: "earthquake".into(),
            action: "toggle".into(),
        }
        .validate("test")
        .unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("toggle"));
    }
}
