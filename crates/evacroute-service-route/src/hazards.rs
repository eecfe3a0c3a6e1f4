//! Hazard overlay and event status handlers.

use std::convert::Infallible;

use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use evacroute_lib::{HazardEventSnapshot, HazardKind};
use evacroute_service_shared::AppState;

/// SSE event name carried by every status update.
pub const HAZARD_STATUS_EVENT: &str = "hazard-status";

/// GeoJSON served as it was loaded, including features skipped for routing.
fn overlay(state: &AppState, kind: HazardKind) -> Json<Value> {
    Json(state.hazards().layer(kind).geojson().clone())
}

/// Handle GET /api/v1/hazards/flood.
pub(crate) async fn flood_zones(State(state): State<AppState>) -> Json<Value> {
    overlay(&state, HazardKind::Flood)
}

/// Handle GET /api/v1/hazards/earthquake.
pub(crate) async fn earthquake_zones(State(state): State<AppState>) -> Json<Value> {
    overlay(&state, HazardKind::Earthquake)
}

/// Handle GET /api/v1/hazards/status.
pub(crate) async fn status(State(state): State<AppState>) -> Json<HazardEventSnapshot> {
    Json(state.events().snapshot())
}

/// Yields the receiver's current snapshot, then one snapshot per change.
///
/// Intermediate values are coalesced when several changes land between
/// polls. The stream ends when the event state is dropped.
pub fn snapshot_stream(
    receiver: watch::Receiver<HazardEventSnapshot>,
) -> impl Stream<Item = HazardEventSnapshot> {
    stream::unfold((receiver, true), |(mut receiver, first)| async move {
        if !first && receiver.changed().await.is_err() {
            return None;
        }
        let snapshot = *receiver.borrow_and_update();
        Some((snapshot, (receiver, false)))
    })
}

/// Handle GET /api/v1/hazards/status/stream.
pub(crate) async fn status_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.events().subscribe();
    debug!(subscribers = state.events().subscriber_count(), "hazard status subscriber connected");

    let events = snapshot_stream(receiver).filter_map(|snapshot| async move {
        match Event::default().event(HAZARD_STATUS_EVENT).json_data(snapshot) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                warn!(error = %e, "failed to encode hazard status event");
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evacroute_lib::HazardEvents;
    use std::time::Duration;

    #[tokio::test]
    async fn stream_starts_with_current_state_then_follows_changes() {
        let events = HazardEvents::default();
        events.enable(HazardKind::Earthquake);

        let mut updates = Box::pin(snapshot_stream(events.subscribe()));

        let first = updates.next().await.unwrap();
        assert!(first.state.earthquake_active);
        assert!(!first.state.flood_active);

        events.enable(HazardKind::Flood);
        let second = tokio::time::timeout(Duration::from_secs(1), updates.next())
            .await
            .unwrap()
            .unwrap();
        assert!(second.state.flood_active);
        assert!(second.changed_at.is_some());
    }

    #[tokio::test]
    async fn redundant_toggle_emits_nothing() {
        let events = HazardEvents::default();
        let mut updates = Box::pin(snapshot_stream(events.subscribe()));
        updates.next().await.unwrap();

        events.disable(HazardKind::Flood);
        let pending = tokio::time::timeout(Duration::from_millis(50), updates.next()).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn stream_ends_when_state_is_dropped() {
        let events = HazardEvents::default();
        let mut updates = Box::pin(snapshot_stream(events.subscribe()));
        updates.next().await.unwrap();

        drop(events);
        assert!(updates.next().await.is_none());
    }
}
