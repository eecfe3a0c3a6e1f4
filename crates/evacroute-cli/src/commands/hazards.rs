//! Hazard dataset summary.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use evacroute_lib::{HazardKind, HazardLayer, HazardZoneStore};

#[derive(Debug, Clone, Serialize)]
pub struct HazardSummary {
    pub layers: Vec<LayerSummary>,
}

/// Zone counts for one hazard kind.
#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub kind: HazardKind,
    pub zones: usize,
    pub skipped: usize,
    /// Zone count per flood severity; empty for earthquake layers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub severities: BTreeMap<&'static str, usize>,
    pub names: Vec<String>,
}

impl LayerSummary {
    fn from_layer(layer: &HazardLayer) -> Self {
        let mut severities = BTreeMap::new();
        for zone in layer.zones() {
            if let Some(severity) = zone.severity {
                *severities.entry(severity.as_str()).or_insert(0) += 1;
            }
        }

        Self {
            kind: layer.kind(),
            zones: layer.len(),
            skipped: layer.skipped(),
            severities,
            names: layer.zones().iter().map(|zone| zone.name.clone()).collect(),
        }
    }
}

/// Handle the hazards subcommand.
pub fn handle_hazards(
    flood_hazards: Option<&Path>,
    earthquake_hazards: Option<&Path>,
) -> Result<HazardSummary> {
    let store = HazardZoneStore::load(flood_hazards, earthquake_hazards)?;
    Ok(summarize(&store))
}

pub fn summarize(store: &HazardZoneStore) -> HazardSummary {
    HazardSummary {
        layers: HazardKind::ALL
            .iter()
            .map(|kind| LayerSummary::from_layer(store.layer(*kind)))
            .collect(),
    }
}
