//! Rank ambulances by travel time to a target
//!
//! Each station's route search is independent and only reads the graph, so
//! the searches run in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::pathfinding::find_routes;
use super::route::Route;
use crate::city::{AmbulanceId, Station, StationId};
use crate::core::config::RoutingConfig;
use crate::core::types::GeoPoint;
use crate::network::{EdgeKey, RoadGraph};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbulanceRanking {
    pub ambulance: AmbulanceId,
    pub station: StationId,
    /// None when every road from the station is cut off
    pub fastest: Option<Route>,
}

impl AmbulanceRanking {
    pub fn time_min(&self) -> Option<f64> {
        self.fastest.as_ref().map(|r| r.time_min)
    }
}

/// Fastest route from every station, quickest first; unreachable last
pub fn rank_ambulances(
    graph: &RoadGraph,
    stations: &[Station],
    target: &GeoPoint,
    blocked: &[EdgeKey],
    routing: &RoutingConfig,
) -> Vec<AmbulanceRanking> {
    let mut rankings: Vec<AmbulanceRanking> = stations
        .par_iter()
        .map(|station| {
            let fastest = find_routes(graph, &station.location, target, blocked, routing)
                .into_iter()
                .next();
            AmbulanceRanking {
                ambulance: AmbulanceId(station.id.0),
                station: station.id,
                fastest,
            }
        })
        .collect();

    rankings.sort_by(|a, b| match (a.time_min(), b.time_min()) {
        (Some(ta), Some(tb)) => ta.total_cmp(&tb).then(a.ambulance.cmp(&b.ambulance)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.ambulance.cmp(&b.ambulance),
    });

    rankings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CityConfig, NetworkConfig};
    use crate::network::generate_network;

    #[test]
    fn test_ranking_orders_by_time() {
        let city = CityConfig::default();
        let graph = generate_network(
            &city,
            &NetworkConfig {
                seed: 3,
                spacing: 0.008,
                jitter: 0.1,
            },
        );
        let stations = Station::layout(&city);

        // Right next to the north station
        let target = stations[1].location.offset(0.001, 0.0);
        let rankings = rank_ambulances(
            &graph,
            &stations,
            &target,
            &[],
            &RoutingConfig::default(),
        );

        assert_eq!(rankings.len(), 6);
        assert_eq!(rankings[0].station, StationId(2));

        let times: Vec<f64> = rankings.iter().filter_map(AmbulanceRanking::time_min).collect();
        assert_eq!(times.len(), 6);
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_unreachable_sorted_last() {
        use crate::network::{HighwayClass, NodeId};

        let mut graph = RoadGraph::new();
        graph.add_node(NodeId(1), GeoPoint::new(50.0, 36.0));
        graph.add_node(NodeId(2), GeoPoint::new(50.0, 36.01));
        graph.add_node(NodeId(3), GeoPoint::new(50.05, 36.05));
        graph.add_two_way(NodeId(1), NodeId(2), 0, HighwayClass::Primary, &[]);

        let stations = vec![
            Station::new(StationId(1), "Island", GeoPoint::new(50.05, 36.05)),
            Station::new(StationId(2), "Connected", GeoPoint::new(50.0, 36.0)),
        ];
        let rankings = rank_ambulances(
            &graph,
            &stations,
            &GeoPoint::new(50.0, 36.01),
            &[],
            &RoutingConfig::default(),
        );

        assert_eq!(rankings[0].ambulance, AmbulanceId(2));
        assert!(rankings[0].fastest.is_some());
        assert_eq!(rankings[1].ambulance, AmbulanceId(1));
        assert_eq!(rankings[1].time_min(), None);
    }
}
