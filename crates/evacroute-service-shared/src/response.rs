//! Response wrapper for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Wrapper for successful JSON responses with content type metadata.
///
/// Mirrors the `content_type` member of `ProblemDetails` so clients can branch
/// on a single field. Raw GeoJSON overlays are served without this wrapper.
///
/// # Example
///
/// ```
/// use evacroute_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Toggled {
///     message: String,
///     flood_active: bool,
/// }
///
/// let response = ServiceResponse::new(Toggled {
///     message: "Flood event enabled".into(),
///     flood_active: true,
/// });
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
