// Routing benchmarks
//
// Run with: cargo bench --bench routing_bench

use ambulance_logistics::city::Station;
use ambulance_logistics::core::config::{CityConfig, DamageConfig, NetworkConfig, RoutingConfig};
use ambulance_logistics::emergency::simulate_damage;
use ambulance_logistics::network::generate_network;
use ambulance_logistics::routing::{find_routes, rank_ambulances};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_find_routes(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_routes");
    let city = CityConfig::default();
    let routing = RoutingConfig::default();

    for spacing in [0.008, 0.004, 0.002] {
        let graph = generate_network(
            &city,
            &NetworkConfig {
                spacing,
                ..NetworkConfig::default()
            },
        );
        let stations = Station::layout(&city);
        let target = city.center.offset(0.012, -0.017);

        group.bench_with_input(
            BenchmarkId::new("station_to_emergency", graph.node_count()),
            &graph,
            |b, graph| {
                b.iter(|| {
                    find_routes(
                        graph,
                        black_box(&stations[4].location),
                        black_box(&target),
                        &[],
                        &routing,
                    )
                })
            },
        );
    }

    group.finish();
}

fn bench_damaged_ranking(c: &mut Criterion) {
    let city = CityConfig::default();
    let damage = DamageConfig::default();
    let graph = generate_network(&city, &NetworkConfig::default());
    let major = graph.major_road_edges(&city.center, damage.major_road_radius);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let blocked = simulate_damage(&graph, &major, &city.center, &damage, &mut rng)
        .map(|d| d.blocked)
        .unwrap_or_default();
    let stations = Station::layout(&city);
    let target = city.center.offset(-0.01, 0.02);
    let routing = RoutingConfig::default();

    c.bench_function("rank_ambulances_damaged", |b| {
        b.iter(|| rank_ambulances(&graph, &stations, black_box(&target), &blocked, &routing))
    });
}

criterion_group!(benches, bench_find_routes, bench_damaged_ranking);
criterion_main!(benches);
