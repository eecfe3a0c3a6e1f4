//! Directions provider boundary.
//!
//! [`DirectionsProvider`] is the seam the routing flow depends on;
//! [`MapboxDirections`] is the production implementation. Provider JSON is
//! normalized into [`RawCandidatePath`] values here so nothing loosely typed
//! reaches the ranking engine. Every failure, whether transport, upstream
//! status, or response shape, surfaces as [`Error::RoutingFailed`]; an empty
//! route list surfaces as [`Error::NoCandidatePaths`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::candidate::RawCandidatePath;
use crate::coords::GeoPoint;
use crate::error::{Error, Result};

pub const DEFAULT_DIRECTIONS_BASE_URL: &str = "https://api.mapbox.com";
pub const DEFAULT_DIRECTIONS_TIMEOUT: Duration = Duration::from_secs(10);

/// How the requester travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TravelMode {
    Walking,
    Driving,
    TwoWheeler,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Driving => "driving",
            TravelMode::TwoWheeler => "two-wheeler",
        }
    }

    /// Provider routing profile. The provider has no motorcycle profile, so
    /// two-wheelers are routed as cycling.
    pub fn profile(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Driving => "driving",
            TravelMode::TwoWheeler => "cycling",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "walking" => Ok(TravelMode::Walking),
            "driving" => Ok(TravelMode::Driving),
            "two-wheeler" => Ok(TravelMode::TwoWheeler),
            other => Err(Error::UnknownTravelMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// Fetches alternative paths between two points.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Return every alternative the provider offers, in provider order.
    ///
    /// Implementations must never return an empty `Ok`.
    async fn alternatives(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        mode: TravelMode,
    ) -> Result<Vec<RawCandidatePath>>;
}

/// Connection settings for [`MapboxDirections`].
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub access_token: String,
    pub timeout: Duration,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIRECTIONS_BASE_URL.to_string(),
            access_token: String::new(),
            timeout: DEFAULT_DIRECTIONS_TIMEOUT,
        }
    }
}

/// Mapbox Directions v5 client.
#[derive(Debug, Clone)]
pub struct MapboxDirections {
    client: Client,
    base_url: String,
    access_token: String,
}

impl MapboxDirections {
    pub fn new(config: DirectionsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()
            .map_err(|e| Error::routing_failed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token,
        })
    }

    fn request_url(&self, origin: GeoPoint, destination: GeoPoint, mode: TravelMode) -> String {
        format!(
            "{}/directions/v5/mapbox/{}/{},{};{},{}",
            self.base_url,
            mode.profile(),
            origin.lng(),
            origin.lat(),
            destination.lng(),
            destination.lat()
        )
    }
}

fn user_agent() -> String {
    format!("evacroute-lib/{}", env!("CARGO_PKG_VERSION"))
}

#[async_trait]
impl DirectionsProvider for MapboxDirections {
    async fn alternatives(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        mode: TravelMode,
    ) -> Result<Vec<RawCandidatePath>> {
        let url = self.request_url(origin, destination, mode);
        debug!(origin = %origin, destination = %destination, profile = mode.profile(), "requesting directions");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("alternatives", "true"),
                ("geometries", "geojson"),
                ("overview", "full"),
                ("steps", "false"),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::routing_failed(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::routing_failed(e.without_url().to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
                });
            warn!(status = status.as_u16(), message = %message, "directions provider returned an error");
            return Err(Error::RoutingFailed { message });
        }

        let parsed: DirectionsResponse = serde_json::from_str(&body)
            .map_err(|e| Error::routing_failed(format!("unexpected directions response: {e}")))?;
        normalize_response(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: Option<String>,
}

/// Directions response as sent by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<ProviderRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRoute {
    pub geometry: ProviderGeometry,
    pub distance: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<f64>>,
}

/// Map a provider response onto strict candidate paths.
///
/// Either every route is valid or the whole response is rejected. A
/// `NoRoute` code is reported the same way as an empty route list.
pub fn normalize_response(response: DirectionsResponse) -> Result<Vec<RawCandidatePath>> {
    if let Some(code) = response.code.as_deref() {
        if code == "NoRoute" {
            return Err(Error::NoCandidatePaths);
        }
        if code != "Ok" {
            return Err(Error::RoutingFailed {
                message: response.message.unwrap_or_else(|| code.to_string()),
            });
        }
    }

    if response.routes.is_empty() {
        return Err(Error::NoCandidatePaths);
    }

    response
        .routes
        .into_iter()
        .enumerate()
        .map(|(index, route)| {
            normalize_route(route)
                .map_err(|e| Error::routing_failed(format!("route {index} is malformed: {e}")))
        })
        .collect()
}

fn normalize_route(route: ProviderRoute) -> Result<RawCandidatePath> {
    if route.geometry.kind != "LineString" {
        return Err(Error::InvalidCandidatePath {
            message: format!("expected LineString geometry, got {}", route.geometry.kind),
        });
    }

    let points = route
        .geometry
        .coordinates
        .iter()
        .map(|position| GeoPoint::from_position(position))
        .collect::<Result<Vec<_>>>()?;

    RawCandidatePath::new(points, route.distance, route.duration)
}
