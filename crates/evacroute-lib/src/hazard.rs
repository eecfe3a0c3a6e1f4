//! Static hazard zone storage and geometric queries.
//!
//! Hazard layers are loaded once from GeoJSON FeatureCollections and are
//! read-only afterwards. Individual features that cannot be turned into a
//! usable Polygon or MultiPolygon are logged and skipped; only a document that
//! is not a FeatureCollection at all is rejected.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use geo::{Coord, Intersects, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::coords::GeoPoint;
use crate::error::{Error, Result};

/// Disaster category a zone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    Flood,
    Earthquake,
}

impl HazardKind {
    pub const ALL: [HazardKind; 2] = [HazardKind::Flood, HazardKind::Earthquake];

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardKind::Flood => "flood",
            HazardKind::Earthquake => "earthquake",
        }
    }
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HazardKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "flood" => Ok(HazardKind::Flood),
            "earthquake" => Ok(HazardKind::Earthquake),
            other => Err(format!("unknown hazard kind '{other}'")),
        }
    }
}

/// Severity carried by flood zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloodSeverity {
    Low,
    Medium,
    High,
    #[default]
    None,
}

impl FloodSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FloodSeverity::Low => "low",
            FloodSeverity::Medium => "medium",
            FloodSeverity::High => "high",
            FloodSeverity::None => "none",
        }
    }

    /// Read the severity from feature properties.
    ///
    /// Accepts a `severity` string (`low`/`medium`/`high`/`none`, any case) or
    /// the numeric `Var` hazard level used by flood-hazard map exports
    /// (1 = low, 2 = medium, 3 = high). Anything else is `None`.
    fn from_properties(properties: &Map<String, Value>) -> Self {
        if let Some(label) = properties.get("severity").and_then(Value::as_str) {
            return match label.trim().to_ascii_lowercase().as_str() {
                "low" => FloodSeverity::Low,
                "medium" => FloodSeverity::Medium,
                "high" => FloodSeverity::High,
                _ => FloodSeverity::None,
            };
        }

        match properties.get("Var").and_then(Value::as_f64) {
            Some(level) if level == 1.0 => FloodSeverity::Low,
            Some(level) if level == 2.0 => FloodSeverity::Medium,
            Some(level) if level == 3.0 => FloodSeverity::High,
            _ => FloodSeverity::None,
        }
    }
}

impl fmt::Display for FloodSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zone boundary: a simple polygon or a multi-polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl ZoneGeometry {
    /// Point-in-polygon test. Points on the boundary count as inside.
    pub fn contains_point(&self, point: GeoPoint) -> bool {
        let coord = Coord::from(point);
        match self {
            ZoneGeometry::Polygon(polygon) => polygon.intersects(&coord),
            ZoneGeometry::MultiPolygon(multi) => {
                multi.0.iter().any(|polygon| polygon.intersects(&coord))
            }
        }
    }

    /// Whether the line crosses, touches, or lies within this geometry.
    pub fn intersects_line(&self, line: &LineString<f64>) -> bool {
        match self {
            ZoneGeometry::Polygon(polygon) => line.intersects(polygon),
            ZoneGeometry::MultiPolygon(multi) => multi.0.iter().any(|p| line.intersects(p)),
        }
    }
}

/// A named hazard region.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardZone {
    pub name: String,
    pub kind: HazardKind,
    /// Present for flood zones only.
    pub severity: Option<FloodSeverity>,
    pub geometry: ZoneGeometry,
}

/// All zones of one hazard kind plus the document they were loaded from.
#[derive(Debug, Clone)]
pub struct HazardLayer {
    kind: HazardKind,
    zones: Vec<HazardZone>,
    skipped: usize,
    source: Arc<Value>,
}

impl HazardLayer {
    /// An empty layer. Every query against it reports no hazard.
    pub fn empty(kind: HazardKind) -> Self {
        Self {
            kind,
            zones: Vec::new(),
            skipped: 0,
            source: Arc::new(json!({ "type": "FeatureCollection", "features": [] })),
        }
    }

    /// Build a layer from an already-parsed GeoJSON document.
    pub fn from_geojson(kind: HazardKind, document: Value) -> Result<Self> {
        let features = match (
            document.get("type").and_then(Value::as_str),
            document.get("features").and_then(Value::as_array),
        ) {
            (Some("FeatureCollection"), Some(features)) => features,
            _ => {
                return Err(Error::InvalidHazardData {
                    message: format!("{kind} hazard document is not a GeoJSON FeatureCollection"),
                })
            }
        };

        let mut zones = Vec::with_capacity(features.len());
        let mut skipped = 0;
        for (index, feature) in features.iter().enumerate() {
            match parse_zone(kind, index, feature) {
                Ok((zone, dropped)) => {
                    for reason in dropped {
                        skipped += 1;
                        warn!(
                            kind = %kind,
                            index,
                            zone = %zone.name,
                            reason = %reason,
                            "dropping malformed part of hazard feature"
                        );
                    }
                    zones.push(zone);
                }
                Err(reason) => {
                    skipped += 1;
                    warn!(kind = %kind, index, reason = %reason, "skipping malformed hazard feature");
                }
            }
        }

        Ok(Self {
            kind,
            zones,
            skipped,
            source: Arc::new(document),
        })
    }

    /// Load a layer from a GeoJSON file on disk.
    pub fn from_path(kind: HazardKind, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::HazardDataNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&text)?;
        Self::from_geojson(kind, document)
    }

    pub fn kind(&self) -> HazardKind {
        self.kind
    }

    pub fn zones(&self) -> &[HazardZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Number of features dropped during loading.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The GeoJSON document as loaded, for map overlays.
    pub fn geojson(&self) -> &Value {
        &self.source
    }

    /// Whether `point` lies inside any zone of this layer.
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.zones.iter().any(|zone| zone.geometry.contains_point(point))
    }

    /// Zones whose geometry intersects the full path line.
    pub fn intersecting<'a>(
        &'a self,
        line: &'a LineString<f64>,
    ) -> impl Iterator<Item = &'a HazardZone> + 'a {
        self.zones
            .iter()
            .filter(move |zone| zone.geometry.intersects_line(line))
    }
}

/// Flood and earthquake layers for the served region.
#[derive(Debug, Clone)]
pub struct HazardZoneStore {
    flood: HazardLayer,
    earthquake: HazardLayer,
}

impl Default for HazardZoneStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl HazardZoneStore {
    pub fn new(flood: HazardLayer, earthquake: HazardLayer) -> Self {
        Self { flood, earthquake }
    }

    pub fn empty() -> Self {
        Self::new(
            HazardLayer::empty(HazardKind::Flood),
            HazardLayer::empty(HazardKind::Earthquake),
        )
    }

    /// Load both layers from disk. A `None` path yields an empty layer.
    pub fn load(flood_path: Option<&Path>, earthquake_path: Option<&Path>) -> Result<Self> {
        let flood = load_layer(HazardKind::Flood, flood_path)?;
        let earthquake = load_layer(HazardKind::Earthquake, earthquake_path)?;
        Ok(Self::new(flood, earthquake))
    }

    pub fn layer(&self, kind: HazardKind) -> &HazardLayer {
        match kind {
            HazardKind::Flood => &self.flood,
            HazardKind::Earthquake => &self.earthquake,
        }
    }

    pub fn contains(&self, kind: HazardKind, point: GeoPoint) -> bool {
        self.layer(kind).contains(point)
    }
}

fn load_layer(kind: HazardKind, path: Option<&Path>) -> Result<HazardLayer> {
    let Some(path) = path else {
        warn!(kind = %kind, "no hazard dataset configured; {} risk will always be zero", kind);
        return Ok(HazardLayer::empty(kind));
    };

    info!(kind = %kind, path = %path.display(), "loading hazard zones");
    let layer = HazardLayer::from_path(kind, path)?;
    info!(
        kind = %kind,
        zones = layer.len(),
        skipped = layer.skipped(),
        "hazard zones loaded"
    );
    Ok(layer)
}

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum RawGeometry {
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

/// Parse one feature into a zone.
///
/// Malformed member polygons and holes are dropped individually and their
/// reasons returned alongside the zone; the feature only fails when no
/// member polygon survives.
fn parse_zone(
    kind: HazardKind,
    index: usize,
    feature: &Value,
) -> std::result::Result<(HazardZone, Vec<String>), String> {
    let raw: RawFeature = serde_json::from_value(feature.clone()).map_err(|e| e.to_string())?;
    let properties = raw.properties.unwrap_or_default();

    let mut dropped = Vec::new();
    let geometry = match raw.geometry.ok_or("feature has no geometry")? {
        RawGeometry::Polygon(rings) => ZoneGeometry::Polygon(build_polygon(&rings, &mut dropped)?),
        RawGeometry::MultiPolygon(polygons) => {
            let mut members = Vec::with_capacity(polygons.len());
            let mut member_errors = Vec::new();
            for (member, rings) in polygons.iter().enumerate() {
                let mut member_dropped = Vec::new();
                match build_polygon(rings, &mut member_dropped) {
                    Ok(polygon) => {
                        members.push(polygon);
                        dropped.extend(
                            member_dropped
                                .into_iter()
                                .map(|reason| format!("member {member}: {reason}")),
                        );
                    }
                    Err(reason) => member_errors.push(format!("member {member}: {reason}")),
                }
            }
            if members.is_empty() {
                return Err(if member_errors.is_empty() {
                    "multi-polygon has no members".to_string()
                } else {
                    format!("multi-polygon has no usable members ({})", member_errors.join("; "))
                });
            }
            dropped.extend(member_errors);
            ZoneGeometry::MultiPolygon(MultiPolygon::new(members))
        }
    };

    let name = properties
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{kind}-{index}"));

    let severity = match kind {
        HazardKind::Flood => Some(FloodSeverity::from_properties(&properties)),
        HazardKind::Earthquake => None,
    };

    let zone = HazardZone {
        name,
        kind,
        severity,
        geometry,
    };
    Ok((zone, dropped))
}

/// Build a polygon from its rings. A bad exterior fails the polygon; a bad
/// hole is left out and reported in `dropped`.
fn build_polygon(
    rings: &[Vec<Position>],
    dropped: &mut Vec<String>,
) -> std::result::Result<Polygon<f64>, String> {
    let (exterior, interiors) = rings.split_first().ok_or("polygon has no rings")?;
    let exterior = build_ring(exterior)?;
    let mut holes = Vec::with_capacity(interiors.len());
    for (hole, ring) in interiors.iter().enumerate() {
        match build_ring(ring) {
            Ok(ring) => holes.push(ring),
            Err(reason) => dropped.push(format!("hole {hole}: {reason}")),
        }
    }
    Ok(Polygon::new(exterior, holes))
}

fn build_ring(positions: &[Position]) -> std::result::Result<LineString<f64>, String> {
    let coords = positions
        .iter()
        .map(|position| GeoPoint::from_position(position).map(Coord::from))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| e.to_string())?;

    let mut distinct = coords.clone();
    distinct.dedup();
    if distinct.len() > 1 && distinct.first() == distinct.last() {
        distinct.pop();
    }
    if distinct.len() < 3 {
        return Err(format!(
            "ring has {} distinct positions, need at least 3",
            distinct.len()
        ));
    }

    Ok(LineString::from(coords))
}
