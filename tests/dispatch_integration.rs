//! Dispatch session integration tests

use ambulance_logistics::city::{AmbulanceId, AmbulanceStatus, StationId, STATION_COUNT};
use ambulance_logistics::core::{DispatchConfig, DispatchError};
use ambulance_logistics::dispatch::DispatchSession;
use ambulance_logistics::network::{generate_network, load_or_generate};
use ambulance_logistics::routing::RouteKind;

fn new_session(seed: u64) -> DispatchSession {
    let config = DispatchConfig::default();
    let graph = generate_network(&config.city, &config.network);
    DispatchSession::new(config, graph, seed)
}

#[test]
fn test_full_dispatch_cycle() {
    let mut session = new_session(42);

    // Nothing happens before the first call
    assert!(session.emergency().is_none());
    assert!(session.render_map().layers().len() >= STATION_COUNT * 2);

    let location = session.generate_emergency().location;
    assert!(session.config().city.bounds.contains(&location));

    // Ranking covers the whole fleet
    let rankings = session.suggest_ambulances().unwrap();
    assert_eq!(rankings.len(), STATION_COUNT);
    let best = rankings[0].ambulance;

    let routes = session.select_ambulance(best).unwrap().to_vec();
    assert!(!routes.is_empty());
    assert_eq!(routes[0].kind, RouteKind::Fastest);
    assert!((routes[0].time_min - rankings[0].time_min().unwrap()).abs() < 1e-9);

    // Exactly one busy ambulance
    let busy: Vec<_> = session
        .fleet()
        .iter()
        .filter(|a| a.status == AmbulanceStatus::Busy)
        .collect();
    assert_eq!(busy.len(), 1);
    assert_eq!(busy[0].id, best);

    if routes.len() > 1 {
        let second = session.select_route(1).unwrap().clone();
        assert_eq!(second.kind, RouteKind::Alternative);
        assert_eq!(session.selected_route(), Some(&second));
    }
}

#[test]
fn test_single_emergency_slot() {
    let mut session = new_session(7);
    let first = session.generate_emergency().clone();
    let second = session.generate_emergency().clone();

    let current = session.emergency().unwrap();
    assert_eq!(current.id, second.id);
    assert_ne!(current.id, first.id);
    assert_eq!(current.sequence, 2);
    assert_eq!(session.snapshot().emergencies_issued, 2);
}

#[test]
fn test_six_stations_survive_everything() {
    let mut session = new_session(3);
    for _ in 0..3 {
        session.generate_emergency();
        session.simulate_damage();
        let _ = session.select_ambulance(AmbulanceId(4));
    }
    assert_eq!(session.stations().len(), STATION_COUNT);
    assert_eq!(session.fleet().len(), STATION_COUNT);

    let ids: Vec<_> = session.stations().iter().map(|s| s.id).collect();
    assert_eq!(ids, (1..=6).map(StationId).collect::<Vec<_>>());
}

#[test]
fn test_emergencies_stay_inside_spawn_area() {
    let mut session = new_session(11);
    let center = session.config().city.center;
    let radius = session.config().emergency.spawn_radius;

    for _ in 0..200 {
        let p = session.generate_emergency().location;
        assert!((p.lat - center.lat).abs() <= radius + 1e-12);
        assert!((p.lon - center.lon).abs() <= radius + 1e-12);
    }
}

#[test]
fn test_damage_replaces_previous_damage() {
    let mut session = new_session(19);
    assert!(session.simulate_damage());
    let first = session.damage().clone();
    assert!(session.simulate_damage());
    let second = session.damage().clone();

    assert!(!second.impact_zones.is_empty());
    assert!(second.impact_zones.len() <= 5);
    assert_ne!(first, second);
}

#[test]
fn test_routes_avoid_blocked_roads_after_damage() {
    let mut session = new_session(23);
    for _ in 0..5 {
        session.generate_emergency();
        session.simulate_damage();
        if session.select_ambulance(AmbulanceId(1)).is_err() {
            continue;
        }
        for route in session.routes() {
            for edge in &route.edges {
                assert!(!session.damage().is_blocked(edge), "route uses {:?}", edge);
            }
        }
    }
}

#[test]
fn test_errors_leave_state_untouched() {
    let mut session = new_session(5);
    assert!(matches!(
        session.select_route(0),
        Err(DispatchError::UnknownRoute(1))
    ));

    session.generate_emergency();
    let before = session.snapshot();
    assert!(session.select_ambulance(AmbulanceId(0)).is_err());
    let after = session.snapshot();
    assert_eq!(before.ambulances, after.ambulances);
    assert_eq!(before.selected_ambulance, after.selected_ambulance);
}

#[test]
fn test_graph_cache_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("road_graph.json");
    let config = DispatchConfig::default();

    let generated = load_or_generate(&path, &config).unwrap();
    assert!(path.exists());
    let cached = load_or_generate(&path, &config).unwrap();

    assert_eq!(generated.node_count(), cached.node_count());
    assert_eq!(generated.edge_count(), cached.edge_count());

    let mut a = DispatchSession::new(config.clone(), generated, 8);
    let mut b = DispatchSession::new(config, cached, 8);
    a.generate_emergency();
    b.generate_emergency();
    let ra: Vec<_> = a
        .select_ambulance(AmbulanceId(2))
        .unwrap()
        .iter()
        .map(|r| r.path.clone())
        .collect();
    let rb: Vec<_> = b
        .select_ambulance(AmbulanceId(2))
        .unwrap()
        .iter()
        .map(|r| r.path.clone())
        .collect();
    assert_eq!(ra, rb);
}
