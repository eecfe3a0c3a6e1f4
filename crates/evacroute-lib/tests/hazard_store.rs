mod common;

use common::{fixture_store, fixtures_dir, point};
use evacroute_lib::{
    intersection_penalty, path_risk, Error, FloodSeverity, HazardKind, HazardLayer,
    HazardZoneStore,
};

#[test]
fn loads_fixture_layers_and_skips_degenerate_polygon() {
    let store = fixture_store();

    let flood = store.layer(HazardKind::Flood);
    assert_eq!(flood.len(), 3);
    assert_eq!(flood.skipped(), 1);

    let severities: Vec<_> = flood
        .zones()
        .iter()
        .map(|zone| (zone.name.as_str(), zone.severity))
        .collect();
    assert_eq!(
        severities,
        vec![
            ("Marikina Riverbanks", Some(FloodSeverity::High)),
            ("Nangka Lowlands", Some(FloodSeverity::Medium)),
            ("Tumana Creek", Some(FloodSeverity::Low)),
        ]
    );

    let quake = store.layer(HazardKind::Earthquake);
    assert_eq!(quake.len(), 1);
    assert!(quake.zones()[0].severity.is_none());
}

#[test]
fn geojson_is_served_as_loaded() {
    let store = fixture_store();
    let features = store.layer(HazardKind::Flood).geojson()["features"]
        .as_array()
        .expect("features array");
    // The raw overlay keeps every feature, including the one skipped for scoring.
    assert_eq!(features.len(), 4);
}

#[test]
fn multipolygon_members_are_all_checked() {
    let store = fixture_store();
    assert!(store.contains(HazardKind::Flood, point(121.082, 14.642)));
    assert!(store.contains(HazardKind::Flood, point(121.142, 14.602)));
    assert!(!store.contains(HazardKind::Flood, point(121.11, 14.61)));
}

#[test]
fn polygon_edge_counts_as_inside() {
    let store = fixture_store();
    assert!(store.contains(HazardKind::Earthquake, point(121.09, 14.65)));
    assert!(store.contains(HazardKind::Flood, point(121.095, 14.62)));
}

#[test]
fn penalty_sums_every_intersected_zone() {
    let store = fixture_store();
    // Riverbank (high) then Nangka (medium).
    let path = [
        point(121.09, 14.65),
        point(121.12, 14.65),
        point(121.12, 14.71),
    ];
    assert_eq!(intersection_penalty(&store, &path), 4500.0);

    // Every vertex sits outside a zone, yet the line crosses the riverbank.
    let skipping = [point(121.09, 14.65), point(121.11, 14.65)];
    assert_eq!(intersection_penalty(&store, &skipping), 3000.0);
    assert_eq!(path_risk(&store, HazardKind::Flood, &skipping), 0.0);
}

#[test]
fn sampling_visits_fifty_points_of_a_long_path() {
    let store = fixture_store();
    // 10,000 points, all inside the riverbank zone.
    let path: Vec<_> = (0..10_000)
        .map(|i| point(121.1, 14.63 + (i as f64) * 0.000_004))
        .collect();
    assert_eq!(path_risk(&store, HazardKind::Flood, &path), 50.0 * 5.0);
}

#[test]
fn missing_layer_file_is_reported() {
    let missing = fixtures_dir().join("no_such_layer.geojson");
    let err = HazardZoneStore::load(Some(missing.as_path()), None).unwrap_err();
    assert!(matches!(err, Error::HazardDataNotFound { .. }));
}

#[test]
fn unconfigured_layers_are_empty() {
    let store = HazardZoneStore::load(None, None).expect("empty store");
    assert!(store.layer(HazardKind::Flood).is_empty());
    assert!(store.layer(HazardKind::Earthquake).is_empty());
    assert_eq!(
        path_risk(&store, HazardKind::Flood, &[point(121.1, 14.65), point(121.2, 14.7)]),
        0.0
    );
}

#[test]
fn non_collection_document_is_rejected() {
    let err = HazardLayer::from_geojson(
        HazardKind::Flood,
        serde_json::json!({"type": "Feature", "geometry": null}),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidHazardData { .. }));
}

fn unit_square(offset: f64) -> serde_json::Value {
    serde_json::json!([[
        [offset, offset],
        [offset + 1.0, offset],
        [offset + 1.0, offset + 1.0],
        [offset, offset + 1.0],
        [offset, offset]
    ]])
}

#[test]
fn bad_multipolygon_member_keeps_the_valid_members() {
    let doc = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "split basin", "severity": "high" },
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    unit_square(0.0),
                    [[[5.0, 5.0], [5.0, 5.0], [5.0, 5.0]]]
                ]
            }
        }]
    });
    let flood = HazardLayer::from_geojson(HazardKind::Flood, doc).expect("layer loads");
    assert_eq!(flood.len(), 1);
    assert_eq!(flood.skipped(), 1);
    assert_eq!(flood.zones()[0].name, "split basin");

    let store = HazardZoneStore::new(flood, HazardLayer::empty(HazardKind::Earthquake));
    let inside = [point(0.5, 0.5), point(0.6, 0.6)];
    assert!(store.contains(HazardKind::Flood, point(0.5, 0.5)));
    assert_eq!(path_risk(&store, HazardKind::Flood, &inside), 10.0);
    assert_eq!(intersection_penalty(&store, &inside), 3000.0);
}

#[test]
fn multipolygon_without_usable_members_is_skipped() {
    let doc = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [[[[5.0, 5.0], [5.0, 5.0], [5.0, 5.0]]], []]
            }
        }]
    });
    let flood = HazardLayer::from_geojson(HazardKind::Flood, doc).expect("layer loads");
    assert!(flood.is_empty());
    assert_eq!(flood.skipped(), 1);
}

#[test]
fn bad_hole_is_dropped_and_outer_ring_kept() {
    let doc = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                    [[4.0, 4.0], [4.0, 4.0], [4.0, 4.0]],
                    [[6.0, 6.0], [8.0, 6.0], [8.0, 8.0], [6.0, 8.0], [6.0, 6.0]]
                ]
            }
        }]
    });
    let quake = HazardLayer::from_geojson(HazardKind::Earthquake, doc).expect("layer loads");
    assert_eq!(quake.len(), 1);
    assert_eq!(quake.skipped(), 1);
    assert!(quake.contains(point(4.0, 4.0)));
    assert!(quake.contains(point(1.0, 1.0)));
    assert!(!quake.contains(point(7.0, 7.0)));
}
