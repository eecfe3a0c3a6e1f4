mod common;

use common::{fixture_paths, fixture_store, point};
use evacroute_lib::{
    rank_routes, HazardEventState, RankedRoutes, RankingStrategy, RawCandidatePath, RiskLevel,
    RouteLabel,
};

fn durations(routes: &RankedRoutes) -> Vec<f64> {
    match routes {
        RankedRoutes::RiskThenTime(routes) => {
            routes.iter().map(|r| r.path.duration_seconds()).collect()
        }
        RankedRoutes::TimePlusPenalty(routes) => {
            routes.iter().map(|r| r.path.duration_seconds()).collect()
        }
    }
}

#[test]
fn clear_detours_outrank_flooded_shortcut() {
    let store = fixture_store();
    let ranked = rank_routes(
        RankingStrategy::RiskThenTime,
        &store,
        fixture_paths(),
        HazardEventState::new(true, false),
    )
    .expect("ranking succeeds");

    assert_eq!(durations(&ranked), vec![600.0, 700.0, 500.0]);

    let RankedRoutes::RiskThenTime(routes) = ranked else {
        panic!("expected risk-then-time output");
    };
    assert!(routes[0].is_default);
    assert_eq!(routes.iter().filter(|r| r.is_default).count(), 1);
    assert_eq!(routes[0].combined_risk, 0.0);
    assert_eq!(routes[0].label, RouteLabel::Safest);
    assert_eq!(routes[1].label, RouteLabel::Safest);
    assert_eq!(routes[2].label, RouteLabel::Fastest);
    assert!(routes[2].combined_risk > 0.0);
    assert_eq!(routes[2].risk_level, RiskLevel::High);
}

#[test]
fn without_active_events_fastest_path_leads() {
    let ranked = rank_routes(
        RankingStrategy::RiskThenTime,
        &fixture_store(),
        fixture_paths(),
        HazardEventState::default(),
    )
    .expect("ranking succeeds");

    assert_eq!(durations(&ranked), vec![500.0, 600.0, 700.0]);
    let RankedRoutes::RiskThenTime(routes) = ranked else {
        panic!("expected risk-then-time output");
    };
    assert_eq!(routes[0].label, RouteLabel::SafestAndFastest);
    assert!(routes
        .iter()
        .all(|r| r.risk_level == RiskLevel::Low && r.combined_risk == 0.0));
}

#[test]
fn time_plus_penalty_adds_severity_penalty() {
    let ranked = rank_routes(
        RankingStrategy::TimePlusPenalty,
        &fixture_store(),
        fixture_paths(),
        HazardEventState::new(true, false),
    )
    .expect("ranking succeeds");

    let RankedRoutes::TimePlusPenalty(routes) = ranked else {
        panic!("expected time-plus-penalty output");
    };
    let scores: Vec<f64> = routes.iter().map(|r| r.final_score).collect();
    assert_eq!(scores, vec![600.0, 700.0, 3500.0]);
    assert_eq!(routes[2].hazard_penalty, 3000.0);
    assert!(routes[0].is_default);
}

#[test]
fn earthquake_flag_does_not_affect_time_plus_penalty() {
    let store = fixture_store();
    let quake_only = rank_routes(
        RankingStrategy::TimePlusPenalty,
        &store,
        fixture_paths(),
        HazardEventState::new(false, true),
    )
    .expect("ranking succeeds");
    assert_eq!(durations(&quake_only), vec![500.0, 600.0, 700.0]);
}

#[test]
fn enabling_more_hazards_never_lowers_risk() {
    let store = fixture_store();
    // Crosses the fault buffer and the riverbank zone.
    let crossing = RawCandidatePath::new(
        vec![
            point(121.075, 14.65),
            point(121.085, 14.66),
            point(121.1, 14.65),
            point(121.12, 14.65),
        ],
        3000.0,
        640.0,
    )
    .expect("valid path");
    let mut paths = fixture_paths();
    paths.push(crossing);

    let states = [
        HazardEventState::new(false, false),
        HazardEventState::new(true, false),
        HazardEventState::new(false, true),
        HazardEventState::new(true, true),
    ];

    let risk_of = |events: HazardEventState| -> Vec<f64> {
        let RankedRoutes::RiskThenTime(mut routes) = rank_routes(
            RankingStrategy::RiskThenTime,
            &store,
            paths.clone(),
            events,
        )
        .expect("ranking succeeds") else {
            panic!("expected risk-then-time output");
        };
        routes.sort_by(|a, b| a.path.distance_meters().total_cmp(&b.path.distance_meters()));
        routes.iter().map(|r| r.combined_risk).collect()
    };

    let none = risk_of(states[0]);
    let flood = risk_of(states[1]);
    let quake = risk_of(states[2]);
    let both = risk_of(states[3]);

    for i in 0..none.len() {
        assert!(flood[i] >= none[i]);
        assert!(quake[i] >= none[i]);
        assert!(both[i] >= flood[i]);
        assert!(both[i] >= quake[i]);
    }
    assert!(both.iter().any(|r| *r > 0.0));
}

#[test]
fn risk_ranking_is_sorted_by_risk_then_duration() {
    let mut paths = fixture_paths();
    paths.push(
        RawCandidatePath::new(
            vec![point(121.115, 14.65), point(121.1, 14.66), point(121.092, 14.65)],
            2600.0,
            450.0,
        )
        .expect("valid path"),
    );

    let RankedRoutes::RiskThenTime(routes) = rank_routes(
        RankingStrategy::RiskThenTime,
        &fixture_store(),
        paths,
        HazardEventState::new(true, true),
    )
    .expect("ranking succeeds") else {
        panic!("expected risk-then-time output");
    };

    for pair in routes.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.combined_risk < b.combined_risk
                || (a.combined_risk == b.combined_risk
                    && a.path.duration_seconds() <= b.path.duration_seconds())
        );
    }
}

#[test]
fn labels_follow_the_risk_and_duration_minimums() {
    let store = fixture_store();
    let crossing = RawCandidatePath::new(
        vec![
            point(121.075, 14.65),
            point(121.085, 14.66),
            point(121.1, 14.65),
            point(121.12, 14.65),
        ],
        3000.0,
        640.0,
    )
    .expect("valid path");
    let mut paths = fixture_paths();
    paths.push(crossing);

    for events in [
        HazardEventState::new(false, false),
        HazardEventState::new(true, false),
        HazardEventState::new(false, true),
        HazardEventState::new(true, true),
    ] {
        let RankedRoutes::RiskThenTime(routes) = rank_routes(
            RankingStrategy::RiskThenTime,
            &store,
            paths.clone(),
            events,
        )
        .expect("ranking succeeds") else {
            panic!("expected risk-then-time output");
        };

        let min_risk = routes
            .iter()
            .map(|r| r.combined_risk)
            .fold(f64::INFINITY, f64::min);
        let min_duration = routes
            .iter()
            .map(|r| r.path.duration_seconds())
            .fold(f64::INFINITY, f64::min);

        for route in &routes {
            let safest = route.combined_risk == min_risk;
            let fastest = route.path.duration_seconds() == min_duration;
            let expected = match (safest, fastest) {
                (true, true) => RouteLabel::SafestAndFastest,
                (true, false) => RouteLabel::Safest,
                (false, true) => RouteLabel::Fastest,
                (false, false) => RouteLabel::Alternate,
            };
            assert_eq!(
                route.label,
                expected,
                "{events:?}: route of {} s with risk {}",
                route.path.duration_seconds(),
                route.combined_risk
            );
        }
        assert!(routes.iter().any(|r| matches!(
            r.label,
            RouteLabel::Safest | RouteLabel::SafestAndFastest
        )));
    }
}
