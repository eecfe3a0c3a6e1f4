//! Operator-controlled hazard event flags.
//!
//! [`HazardEvents`] is a cloneable handle that every request handler receives
//! explicitly. Writes are rare (drill toggles); reads happen on every routing
//! request and always observe the latest value. Observers can
//! [`subscribe`](HazardEvents::subscribe) to be notified of each change.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use crate::hazard::HazardKind;

/// Which hazard events are currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardEventState {
    pub flood_active: bool,
    pub earthquake_active: bool,
}

impl HazardEventState {
    pub fn new(flood_active: bool, earthquake_active: bool) -> Self {
        Self {
            flood_active,
            earthquake_active,
        }
    }

    pub fn is_active(&self, kind: HazardKind) -> bool {
        match kind {
            HazardKind::Flood => self.flood_active,
            HazardKind::Earthquake => self.earthquake_active,
        }
    }

    /// Force flags on for a single request. Forced flags are OR-ed onto the
    /// live state; a `false` override never switches an active event off.
    pub fn with_overrides(self, force_flood: bool, force_earthquake: bool) -> Self {
        Self {
            flood_active: self.flood_active || force_flood,
            earthquake_active: self.earthquake_active || force_earthquake,
        }
    }

    fn set(&mut self, kind: HazardKind, active: bool) {
        match kind {
            HazardKind::Flood => self.flood_active = active,
            HazardKind::Earthquake => self.earthquake_active = active,
        }
    }
}

/// Event flags plus the time of the last effective change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardEventSnapshot {
    #[serde(flatten)]
    pub state: HazardEventState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<DateTime<Utc>>,
}

/// Shared, observable hazard event state.
#[derive(Debug, Clone)]
pub struct HazardEvents {
    sender: Arc<watch::Sender<HazardEventSnapshot>>,
}

impl Default for HazardEvents {
    fn default() -> Self {
        Self::new(HazardEventState::default())
    }
}

impl HazardEvents {
    pub fn new(initial: HazardEventState) -> Self {
        let (sender, _) = watch::channel(HazardEventSnapshot {
            state: initial,
            changed_at: None,
        });
        Self {
            sender: Arc::new(sender),
        }
    }

    /// The latest flags.
    pub fn current(&self) -> HazardEventState {
        self.sender.borrow().state
    }

    /// The latest flags with their change timestamp.
    pub fn snapshot(&self) -> HazardEventSnapshot {
        *self.sender.borrow()
    }

    pub fn enable(&self, kind: HazardKind) -> HazardEventState {
        self.set(kind, true)
    }

    pub fn disable(&self, kind: HazardKind) -> HazardEventState {
        self.set(kind, false)
    }

    /// Set one flag and notify observers if it actually changed.
    ///
    /// Returns the state after the update.
    pub fn set(&self, kind: HazardKind, active: bool) -> HazardEventState {
        let changed = self.sender.send_if_modified(|snapshot| {
            if snapshot.state.is_active(kind) == active {
                return false;
            }
            snapshot.state.set(kind, active);
            snapshot.changed_at = Some(Utc::now());
            true
        });

        let state = self.current();
        if changed {
            info!(
                kind = %kind,
                active,
                flood_active = state.flood_active,
                earthquake_active = state.earthquake_active,
                "hazard event state changed"
            );
        }
        state
    }

    /// Receive every subsequent change. The receiver starts at the current
    /// value, marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<HazardEventSnapshot> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
