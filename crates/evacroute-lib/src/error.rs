use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the evacroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a coordinate pair is non-finite or outside WGS84 bounds.
    #[error("invalid coordinate: longitude {lng}, latitude {lat}")]
    InvalidCoordinate { lng: f64, lat: f64 },

    /// Raised when a travel mode string is not one of the supported modes.
    #[error("unknown travel mode '{mode}'; expected one of: walking, driving, two-wheeler")]
    UnknownTravelMode { mode: String },

    /// Raised when the facility list handed to the resolver is empty.
    #[error("no evacuation centers available")]
    NoCenters,

    /// Raised when every supplied facility lacked usable coordinates.
    #[error("no evacuation centers with valid coordinates ({skipped} skipped)")]
    NoValidCenters { skipped: usize },

    /// Raised when the directions provider produced zero alternative paths.
    #[error("directions provider returned no routes")]
    NoCandidatePaths,

    /// Raised when a candidate path violates its shape invariants.
    #[error("invalid candidate path: {message}")]
    InvalidCandidatePath { message: String },

    /// Raised for any transport, upstream, or response-shape failure while
    /// fetching directions.
    #[error("routing failed: {message}")]
    RoutingFailed { message: String },

    /// Hazard dataset could not be located at the configured path.
    #[error("hazard dataset not found at {path}")]
    HazardDataNotFound { path: PathBuf },

    /// Raised when a hazard dataset is not a GeoJSON FeatureCollection.
    #[error("invalid hazard data: {message}")]
    InvalidHazardData { message: String },

    /// Raised when the evacuation center list cannot be read.
    #[error("failed to load evacuation centers from {path}: {message}")]
    CenterDataLoad { path: PathBuf, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::RoutingFailed`] from anything printable.
    pub fn routing_failed(message: impl Into<String>) -> Self {
        Error::RoutingFailed {
            message: message.into(),
        }
    }

    /// Whether the error represents an empty candidate set (facilities or paths).
    pub fn is_no_candidates(&self) -> bool {
        matches!(
            self,
            Error::NoCenters | Error::NoValidCenters { .. } | Error::NoCandidatePaths
        )
    }
}
