//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use evacroute_lib::Error as LibError;

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for requests with no usable evacuation center.
pub const PROBLEM_NO_CANDIDATES: &str = "/problems/no-candidates";

/// Problem type URI for a provider that returned zero alternative paths.
pub const PROBLEM_ROUTE_NOT_FOUND: &str = "/problems/route-not-found";

/// Problem type URI for directions provider failures.
pub const PROBLEM_UPSTREAM_FAILURE: &str = "/problems/upstream-failure";

/// Problem type URI for missing or wrong admin credentials.
pub const PROBLEM_UNAUTHORIZED: &str = "/problems/unauthorized";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for service unavailable (e.g., center directory down).
pub const PROBLEM_SERVICE_UNAVAILABLE: &str = "/problems/service-unavailable";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use evacroute_service_shared::{ProblemDetails, PROBLEM_UPSTREAM_FAILURE};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_UPSTREAM_FAILURE,
///     "Upstream Failure",
///     StatusCode::BAD_GATEWAY,
/// )
/// .with_detail("Not Authorized - Invalid Token")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (the request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 for malformed or out-of-range input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 400 when no evacuation center could be resolved.
    pub fn no_candidates(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_NO_CANDIDATES,
            "No Evacuation Centers",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 404 when the provider found no path between the two points.
    pub fn route_not_found(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_ROUTE_NOT_FOUND,
            "Route Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail("The directions provider returned no routes between these points")
        .with_request_id(request_id)
    }

    /// 502 for a failing directions provider, carrying its message.
    pub fn upstream_failure(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_FAILURE,
            "Upstream Failure",
            StatusCode::BAD_GATEWAY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 401 for admin requests without a valid bearer token.
    pub fn unauthorized(request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_UNAUTHORIZED, "Unauthorized", StatusCode::UNAUTHORIZED)
            .with_detail("A valid admin bearer token is required")
            .with_request_id(request_id)
    }

    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn service_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_SERVICE_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::InvalidCoordinate { .. } | LibError::UnknownTravelMode { .. } => {
            ProblemDetails::bad_request(error.to_string(), request_id)
        }
        LibError::NoCenters | LibError::NoValidCenters { .. } => {
            ProblemDetails::no_candidates(error.to_string(), request_id)
        }
        LibError::NoCandidatePaths => ProblemDetails::route_not_found(request_id),
        LibError::RoutingFailed { message } => {
            ProblemDetails::upstream_failure(message.clone(), request_id)
        }
        LibError::InvalidCandidatePath { message } => ProblemDetails::upstream_failure(
            format!("directions provider returned an invalid path: {}", message),
            request_id,
        ),
        LibError::CenterDataLoad { .. } => ProblemDetails::service_unavailable(
            "Evacuation center directory is unavailable",
            request_id,
        ),
        _ => ProblemDetails::internal_error("Unexpected internal error", request_id),
    }
}

/// Short metric label for a library error.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::InvalidCoordinate { .. } | LibError::UnknownTravelMode { .. } => {
            "validation_error"
        }
        LibError::NoCenters | LibError::NoValidCenters { .. } => "no_centers",
        LibError::NoCandidatePaths => "no_path",
        LibError::RoutingFailed { .. } | LibError::InvalidCandidatePath { .. } => "upstream",
        _ => "internal_error",
    }
}
