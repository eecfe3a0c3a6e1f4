use criterion::{criterion_group, criterion_main, Criterion};
use evacroute_lib::{
    intersection_penalty, path_risk, rank_routes, GeoPoint, HazardEventState, HazardKind,
    HazardZoneStore, RankingStrategy, RawCandidatePath,
};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

static STORE: Lazy<HazardZoneStore> = Lazy::new(|| {
    let dir = fixtures_dir();
    HazardZoneStore::load(
        Some(dir.join("flood_zones.geojson").as_path()),
        Some(dir.join("earthquake_zones.geojson").as_path()),
    )
    .expect("fixture layers load")
});

/// A 10,000-point path sweeping west to east across the fixture zones.
static LONG_PATH: Lazy<Vec<GeoPoint>> = Lazy::new(|| {
    (0..10_000)
        .map(|i| {
            let t = i as f64 / 10_000.0;
            GeoPoint::new(121.06 + t * 0.1, 14.62 + t * 0.09).expect("valid point")
        })
        .collect()
});

static ALTERNATIVES: Lazy<Vec<RawCandidatePath>> = Lazy::new(|| {
    (0..3)
        .map(|offset| {
            let shift = offset as f64 * 0.01;
            let points = LONG_PATH
                .iter()
                .map(|p| GeoPoint::new(p.lng(), p.lat() + shift).expect("valid point"))
                .collect();
            RawCandidatePath::new(points, 12_000.0, 900.0 + offset as f64 * 60.0)
                .expect("valid path")
        })
        .collect()
});

fn benchmark_scoring(c: &mut Criterion) {
    let store = &*STORE;
    let path = LONG_PATH.as_slice();

    c.bench_function("path_risk_flood_10k", |b| {
        b.iter(|| black_box(path_risk(store, HazardKind::Flood, black_box(path))));
    });

    c.bench_function("intersection_penalty_10k", |b| {
        b.iter(|| black_box(intersection_penalty(store, black_box(path))));
    });

    c.bench_function("rank_risk_then_time_3x10k", |b| {
        b.iter(|| {
            let ranked = rank_routes(
                RankingStrategy::RiskThenTime,
                store,
                ALTERNATIVES.clone(),
                HazardEventState::new(true, true),
            )
            .expect("ranking succeeds");
            black_box(ranked.len())
        });
    });
}

criterion_group!(benches, benchmark_scoring);
criterion_main!(benches);
