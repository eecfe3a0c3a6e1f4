//! Routing and admin handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
};
use serde::Serialize;
use tracing::{error, info, warn};

use evacroute_lib::{
    EvacuationCenter, GeoPoint, HazardKind, RankingStrategy, RoutePlan,
    RouteQuery as PlanQuery, TravelMode, find_nearest, plan_routes,
};
use evacroute_service_shared::{
    AppState, EventToggleRequest, NearestQuery, NearestRouteQuery, ProblemDetails, RequestId,
    RouteQuery, ServiceResponse, Validate, failure_reason, from_lib_error,
    record_hazard_event_toggle, record_nearest_resolved, record_route_failed,
    record_routes_ranked,
};

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum ApiResponse<T> {
    Success(ServiceResponse<T>),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiResponse::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            ApiResponse::Error(problem) => problem.into_response(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NearestResponse {
    evacuation_center: EvacuationCenter,
    distance_meters: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NearestRouteResponse {
    evacuation_center: EvacuationCenter,
    distance_meters: f64,
    #[serde(flatten)]
    plan: RoutePlan,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventToggleResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    flood_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    earthquake_active: Option<bool>,
}

/// A resolved center and where it is.
struct ResolvedCenter {
    center: EvacuationCenter,
    location: GeoPoint,
    distance_meters: f64,
}

async fn resolve_nearest(
    state: &AppState,
    origin: GeoPoint,
) -> evacroute_lib::Result<ResolvedCenter> {
    let centers = state.centers().evacuation_centers().await?;
    let nearest = find_nearest(origin, &centers)?;
    Ok(ResolvedCenter {
        center: nearest.candidate.clone(),
        location: nearest.location,
        distance_meters: nearest.distance_meters,
    })
}

fn failed(error: &evacroute_lib::Error, request_id: &RequestId, endpoint: &'static str) -> ProblemDetails {
    let reason = failure_reason(error);
    if reason == "upstream" || reason == "internal_error" {
        error!(request_id = %request_id, endpoint, error = %error, "request failed");
    } else {
        warn!(request_id = %request_id, endpoint, error = %error, "request rejected");
    }
    record_route_failed(reason, endpoint);
    from_lib_error(error, request_id.as_str())
}

fn plan_query(
    state: &AppState,
    origin: GeoPoint,
    destination: GeoPoint,
    mode: TravelMode,
    strategy: RankingStrategy,
    force_flood: bool,
    force_earthquake: bool,
) -> PlanQuery {
    let events = state
        .events()
        .current()
        .with_overrides(force_flood, force_earthquake);
    PlanQuery::new(origin, destination, mode)
        .with_strategy(strategy)
        .with_events(events)
}

/// Handle GET /api/v1/nearest.
pub(crate) async fn nearest(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<NearestQuery>,
) -> ApiResponse<NearestResponse> {
    let params = match query.validate(request_id.as_str()) {
        Ok(params) => params,
        Err(problem) => {
            record_route_failed("validation_error", "nearest");
            return ApiResponse::Error(*problem);
        }
    };

    info!(request_id = %request_id, origin = %params.origin, mode = %params.mode, "handling nearest request");

    match resolve_nearest(&state, params.origin).await {
        Ok(resolved) => {
            record_nearest_resolved();
            info!(
                request_id = %request_id,
                center = %resolved.center.id,
                distance_meters = resolved.distance_meters,
                "nearest center resolved"
            );
            ApiResponse::Success(ServiceResponse::new(NearestResponse {
                evacuation_center: resolved.center,
                distance_meters: resolved.distance_meters,
            }))
        }
        Err(e) => ApiResponse::Error(failed(&e, &request_id, "nearest")),
    }
}

/// Handle GET /api/v1/nearest-route.
///
/// Routes to the nearest center and ranks alternatives by risk, then time.
pub(crate) async fn nearest_route(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<NearestRouteQuery>,
) -> ApiResponse<NearestRouteResponse> {
    let params = match query.validate(request_id.as_str()) {
        Ok(params) => params,
        Err(problem) => {
            record_route_failed("validation_error", "nearest-route");
            return ApiResponse::Error(*problem);
        }
    };

    info!(
        request_id = %request_id,
        origin = %params.origin,
        mode = %params.mode,
        test_flood = params.force_flood,
        test_earthquake = params.force_earthquake,
        "handling nearest-route request"
    );

    let resolved = match resolve_nearest(&state, params.origin).await {
        Ok(resolved) => resolved,
        Err(e) => return ApiResponse::Error(failed(&e, &request_id, "nearest-route")),
    };
    record_nearest_resolved();

    let query = plan_query(
        &state,
        params.origin,
        resolved.location,
        params.mode,
        RankingStrategy::RiskThenTime,
        params.force_flood,
        params.force_earthquake,
    );

    match plan_routes(state.directions(), state.hazards(), &query).await {
        Ok(plan) => {
            record_routes_ranked(plan.routes.strategy(), plan.routes.len());
            info!(
                request_id = %request_id,
                center = %resolved.center.id,
                routes = plan.routes.len(),
                "nearest route planned"
            );
            ApiResponse::Success(ServiceResponse::new(NearestRouteResponse {
                evacuation_center: resolved.center,
                distance_meters: resolved.distance_meters,
                plan,
            }))
        }
        Err(e) => ApiResponse::Error(failed(&e, &request_id, "nearest-route")),
    }
}

/// Handle GET /api/v1/route.
///
/// Ranks alternatives by duration plus the severity-weighted flood penalty.
pub(crate) async fn route(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<RouteQuery>,
) -> ApiResponse<RoutePlan> {
    let params = match query.validate(request_id.as_str()) {
        Ok(params) => params,
        Err(problem) => {
            record_route_failed("validation_error", "route");
            return ApiResponse::Error(*problem);
        }
    };

    info!(
        request_id = %request_id,
        origin = %params.origin,
        destination = %params.destination,
        mode = %params.mode,
        "handling route request"
    );

    let query = plan_query(
        &state,
        params.origin,
        params.destination,
        params.mode,
        RankingStrategy::TimePlusPenalty,
        params.force_flood,
        params.force_earthquake,
    );

    match plan_routes(state.directions(), state.hazards(), &query).await {
        Ok(plan) => {
            record_routes_ranked(plan.routes.strategy(), plan.routes.len());
            ApiResponse::Success(ServiceResponse::new(plan))
        }
        Err(e) => ApiResponse::Error(failed(&e, &request_id, "route")),
    }
}

/// Whether the request carries the configured admin bearer token. Always
/// true when no token is configured.
fn is_authorized(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(expected) = state.admin_token() else {
        return true;
    };

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token.trim() == expected)
}

/// Handle POST /api/v1/admin/events/{kind}/{action}.
pub(crate) async fn toggle_event(
    State(state): State<AppState>,
    request_id: RequestId,
    headers: HeaderMap,
    Path(request): Path<EventToggleRequest>,
) -> Result<Json<EventToggleResponse>, ProblemDetails> {
    if !is_authorized(&state, &headers) {
        warn!(request_id = %request_id, kind = %request.kind, "rejected unauthorized event toggle");
        return Err(ProblemDetails::unauthorized(request_id.as_str()));
    }

    let toggle = request.validate(request_id.as_str()).map_err(|problem| *problem)?;

    let updated = state.events().set(toggle.kind, toggle.active);
    record_hazard_event_toggle(toggle.kind, toggle.active);

    let subject = match toggle.kind {
        HazardKind::Flood => "Flood",
        HazardKind::Earthquake => "Earthquake",
    };
    let verb = if toggle.active { "enabled" } else { "disabled" };
    info!(request_id = %request_id, kind = %toggle.kind, active = toggle.active, "hazard event toggled");

    let response = match toggle.kind {
        HazardKind::Flood => EventToggleResponse {
            message: format!("{subject} event {verb}"),
            flood_active: Some(updated.flood_active),
            earthquake_active: None,
        },
        HazardKind::Earthquake => EventToggleResponse {
            message: format!("{subject} event {verb}"),
            flood_active: None,
            earthquake_active: Some(updated.earthquake_active),
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use evacroute_service_shared::test_utils::{TEST_ADMIN_TOKEN, test_state};

    #[test]
    fn bearer_token_must_match() {
        let state = test_state();
        let mut headers = HeaderMap::new();
        assert!(!is_authorized(&state, &headers));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer wrong"));
        assert!(!is_authorized(&state, &headers));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("test-admin-token"));
        assert!(!is_authorized(&state, &headers));

        let value = HeaderValue::from_str(&format!("Bearer {TEST_ADMIN_TOKEN}")).unwrap();
        headers.insert(AUTHORIZATION, value);
        assert!(is_authorized(&state, &headers));
    }

    #[test]
    fn overrides_do_not_touch_shared_flags() {
        let state = test_state();
        let origin = GeoPoint::new(121.115, 14.65).unwrap();
        let query = plan_query(
            &state,
            origin,
            origin,
            TravelMode::Walking,
            RankingStrategy::RiskThenTime,
            true,
            false,
        );
        assert!(query.events.flood_active);
        assert!(!state.events().current().flood_active);
    }
}
