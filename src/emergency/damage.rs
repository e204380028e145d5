//! Simulated road damage
//!
//! A damage event drops several impacts around the city center. Each impact
//! destroys a few of the closest major roads in both directions.

use ahash::AHashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::DamageConfig;
use crate::core::types::GeoPoint;
use crate::network::{EdgeKey, RoadGraph};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactZone {
    pub location: GeoPoint,
    /// Edge directions this impact closed
    pub roads_damaged: usize,
}

/// Result of one damage event; replaces any earlier damage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageState {
    /// Blocked edge directions, in blocking order
    pub blocked: Vec<EdgeKey>,
    /// One polyline per destroyed road, for the map
    pub blocked_geometry: Vec<Vec<GeoPoint>>,
    pub impact_zones: Vec<ImpactZone>,
}

impl DamageState {
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    pub fn is_blocked(&self, key: &EdgeKey) -> bool {
        self.blocked.contains(key)
    }
}

/// Run a damage event over `major_edges`
///
/// Returns None when there are no major roads to damage.
pub fn simulate_damage<R: Rng + ?Sized>(
    graph: &RoadGraph,
    major_edges: &[EdgeKey],
    center: &GeoPoint,
    config: &DamageConfig,
    rng: &mut R,
) -> Option<DamageState> {
    if major_edges.is_empty() {
        return None;
    }

    let num_impacts = rng.gen_range(config.min_impacts..=config.max_impacts);
    let impacts: Vec<GeoPoint> = (0..num_impacts)
        .map(|_| {
            center.offset(
                rng.gen_range(-config.impact_radius..=config.impact_radius),
                rng.gen_range(-config.impact_radius..=config.impact_radius),
            )
        })
        .collect();

    let mut state = DamageState::default();
    let mut blocked_set: AHashSet<EdgeKey> = AHashSet::new();

    for impact in impacts {
        let mut nearby: Vec<(EdgeKey, f64)> = major_edges
            .iter()
            .filter(|key| !blocked_set.contains(key))
            .filter_map(|key| {
                let dist = graph.edge_midpoint(key)?.degree_distance(&impact);
                (dist <= config.block_radius).then_some((*key, dist))
            })
            .collect();
        nearby.sort_by(|a, b| a.1.total_cmp(&b.1));

        let take = rng.gen_range(config.min_roads_per_impact..=config.max_roads_per_impact);
        let mut blocked_count = 0;

        for (edge, _) in nearby.into_iter().take(take) {
            if blocked_set.insert(edge) {
                state.blocked.push(edge);
                if let Some(geometry) = graph.edge_geometry(&edge) {
                    state.blocked_geometry.push(geometry);
                }
                blocked_count += 1;
            }

            // The whole road is destroyed, not just one direction
            let reverse = edge.reversed();
            if graph.has_edge(&reverse) && blocked_set.insert(reverse) {
                state.blocked.push(reverse);
                blocked_count += 1;
            }
        }

        state.impact_zones.push(ImpactZone {
            location: impact,
            roads_damaged: blocked_count,
        });
    }

    tracing::info!(
        "{} impacts, {} roads blocked",
        num_impacts,
        state.blocked.len()
    );
    Some(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CityConfig, NetworkConfig};
    use crate::network::generate_network;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn city_graph() -> (RoadGraph, Vec<EdgeKey>, GeoPoint) {
        let city = CityConfig::default();
        let graph = generate_network(&city, &NetworkConfig::default());
        let major = graph.major_road_edges(&city.center, DamageConfig::default().major_road_radius);
        (graph, major, city.center)
    }

    #[test]
    fn test_no_major_roads_no_damage() {
        let (graph, _, center) = city_graph();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = simulate_damage(&graph, &[], &center, &DamageConfig::default(), &mut rng);
        assert!(result.is_none());
    }

    #[test]
    fn test_impact_count_in_range() {
        let (graph, major, center) = city_graph();
        let config = DamageConfig::default();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let state = simulate_damage(&graph, &major, &center, &config, &mut rng).unwrap();
            let n = state.impact_zones.len() as u32;
            assert!((config.min_impacts..=config.max_impacts).contains(&n));
            let total: usize = state.impact_zones.iter().map(|z| z.roads_damaged).sum();
            assert_eq!(total, state.blocked.len());
        }
    }

    #[test]
    fn test_blocking_is_symmetric_and_unique() {
        let (graph, major, center) = city_graph();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let state =
            simulate_damage(&graph, &major, &center, &DamageConfig::default(), &mut rng).unwrap();

        let unique: AHashSet<_> = state.blocked.iter().collect();
        assert_eq!(unique.len(), state.blocked.len());

        for key in &state.blocked {
            assert!(major.contains(key) || major.contains(&key.reversed()));
            if graph.has_edge(&key.reversed()) {
                assert!(state.is_blocked(&key.reversed()));
            }
        }
    }

    #[test]
    fn test_blocked_roads_near_an_impact() {
        let (graph, major, center) = city_graph();
        let config = DamageConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let state = simulate_damage(&graph, &major, &center, &config, &mut rng).unwrap();

        for key in &state.blocked {
            let mid = graph.edge_midpoint(key).unwrap();
            let near_some_impact = state
                .impact_zones
                .iter()
                .any(|z| z.location.degree_distance(&mid) <= config.block_radius + 1e-12);
            assert!(near_some_impact);
        }
        assert!(state.blocked_geometry.len() <= state.blocked.len());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let (graph, major, center) = city_graph();
        let config = DamageConfig::default();
        let a = simulate_damage(&graph, &major, &center, &config, &mut ChaCha8Rng::seed_from_u64(9));
        let b = simulate_damage(&graph, &major, &center, &config, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
