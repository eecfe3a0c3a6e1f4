//! Exercises the Mapbox client against a local stand-in server.

mod common;

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::{fixtures_dir, point};
use evacroute_lib::{DirectionsConfig, DirectionsProvider, Error, MapboxDirections, TravelMode};
use serde_json::{json, Value};

#[derive(Clone)]
struct Upstream {
    status: StatusCode,
    body: Value,
    delay: Duration,
    seen: Arc<Mutex<Vec<(String, String, HashMap<String, String>)>>>,
}

impl Upstream {
    fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn directions(
    State(upstream): State<Upstream>,
    Path((profile, coordinates)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    upstream
        .seen
        .lock()
        .unwrap()
        .push((profile, coordinates, query));
    if !upstream.delay.is_zero() {
        tokio::time::sleep(upstream.delay).await;
    }
    (upstream.status, Json(upstream.body.clone()))
}

async fn serve(upstream: Upstream) -> String {
    let app = Router::new()
        .route("/directions/v5/mapbox/{profile}/{coordinates}", get(directions))
        .with_state(upstream);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String, timeout: Duration) -> MapboxDirections {
    MapboxDirections::new(DirectionsConfig {
        base_url,
        access_token: "pk.test-token".to_string(),
        timeout,
    })
    .unwrap()
}

fn saved_response() -> Value {
    let text = fs::read_to_string(fixtures_dir().join("directions_response.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn requests_alternatives_and_normalizes_routes() {
    let upstream = Upstream::new(StatusCode::OK, saved_response());
    let seen = upstream.seen.clone();
    let provider = client(serve(upstream).await, Duration::from_secs(5));

    let paths = provider
        .alternatives(point(121.115, 14.65), point(121.092, 14.65), TravelMode::TwoWheeler)
        .await
        .unwrap();

    assert_eq!(paths.len(), 3);
    assert_eq!(paths[0].duration_seconds(), 500.0);
    assert_eq!(paths[2].points().len(), 4);

    let seen = seen.lock().unwrap();
    let (profile, coordinates, query) = &seen[0];
    assert_eq!(profile, "cycling");
    assert_eq!(coordinates, "121.115,14.65;121.092,14.65");
    assert_eq!(query["alternatives"], "true");
    assert_eq!(query["geometries"], "geojson");
    assert_eq!(query["overview"], "full");
    assert_eq!(query["access_token"], "pk.test-token");
}

#[tokio::test]
async fn upstream_error_message_is_carried() {
    let upstream = Upstream::new(
        StatusCode::UNAUTHORIZED,
        json!({ "message": "Not Authorized - Invalid Token" }),
    );
    let provider = client(serve(upstream).await, Duration::from_secs(5));

    let err = provider
        .alternatives(point(121.1, 14.6), point(121.2, 14.7), TravelMode::Driving)
        .await
        .unwrap_err();
    match err {
        Error::RoutingFailed { message } => assert_eq!(message, "Not Authorized - Invalid Token"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn status_text_is_used_without_a_message() {
    let upstream = Upstream::new(StatusCode::SERVICE_UNAVAILABLE, json!({}));
    let provider = client(serve(upstream).await, Duration::from_secs(5));

    let err = provider
        .alternatives(point(121.1, 14.6), point(121.2, 14.7), TravelMode::Walking)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "routing failed: Service Unavailable");
}

#[tokio::test]
async fn empty_route_list_is_no_candidates() {
    let upstream = Upstream::new(StatusCode::OK, json!({ "code": "Ok", "routes": [] }));
    let provider = client(serve(upstream).await, Duration::from_secs(5));

    let err = provider
        .alternatives(point(121.1, 14.6), point(121.2, 14.7), TravelMode::Walking)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoCandidatePaths));
}

#[tokio::test]
async fn no_route_code_is_no_candidates() {
    let upstream = Upstream::new(
        StatusCode::OK,
        json!({ "code": "NoRoute", "message": "No route found", "routes": [] }),
    );
    let provider = client(serve(upstream).await, Duration::from_secs(5));

    let err = provider
        .alternatives(point(121.1, 14.6), point(121.2, 14.7), TravelMode::Driving)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoCandidatePaths));
}

#[tokio::test]
async fn slow_upstream_times_out_as_routing_failure() {
    let mut upstream = Upstream::new(StatusCode::OK, saved_response());
    upstream.delay = Duration::from_millis(500);
    let provider = client(serve(upstream).await, Duration::from_millis(50));

    let err = provider
        .alternatives(point(121.1, 14.6), point(121.2, 14.7), TravelMode::Walking)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RoutingFailed { .. }));
}

#[tokio::test]
async fn unreachable_upstream_is_routing_failure() {
    let provider = client("http://127.0.0.1:9".to_string(), Duration::from_secs(2));
    let err = provider
        .alternatives(point(121.1, 14.6), point(121.2, 14.7), TravelMode::Walking)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RoutingFailed { .. }));
}
