//! Synthetic city road network
//!
//! Produces a jittered street lattice covering the city bounds. Lines through
//! the center are trunk roads, every fourth line is primary, every other line
//! secondary and the rest residential. The outermost ring is a motorway.
//! Some primary blocks get a parallel service lane so the graph exercises
//! multi-edges.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::graph::{NodeId, RoadGraph};
use super::highway::HighwayClass;
use crate::core::config::{CityConfig, NetworkConfig};
use crate::core::types::GeoPoint;

/// Generate the road network for `city`; deterministic per `network.seed`
pub fn generate_network(city: &CityConfig, network: &NetworkConfig) -> RoadGraph {
    let mut rng = ChaCha8Rng::seed_from_u64(network.seed);
    let sw = city.bounds.south_west;
    let ne = city.bounds.north_east;
    let spacing = network.spacing;

    let rows = lattice_len(ne.lat - sw.lat, spacing);
    let cols = lattice_len(ne.lon - sw.lon, spacing);
    let center_row = ((city.center.lat - sw.lat) / spacing).round() as usize;
    let center_col = ((city.center.lon - sw.lon) / spacing).round() as usize;

    let node_id = |row: usize, col: usize| NodeId((row * cols + col) as u64);
    let mut graph = RoadGraph::new();

    for row in 0..rows {
        for col in 0..cols {
            let mut jitter = || {
                if network.jitter > 0.0 {
                    rng.gen_range(-network.jitter..=network.jitter) * spacing
                } else {
                    0.0
                }
            };
            let location = GeoPoint::new(
                sw.lat + row as f64 * spacing + jitter(),
                sw.lon + col as f64 * spacing + jitter(),
            );
            graph.add_node(node_id(row, col), location);
        }
    }

    for row in 0..rows {
        for col in 0..cols {
            let here = node_id(row, col);

            // Eastward segment runs along this row
            if col + 1 < cols {
                let class = line_class(row, rows, center_row);
                let east = node_id(row, col + 1);
                add_segment(&mut graph, &mut rng, here, east, class, spacing);

                if class == HighwayClass::Primary && col % 5 == 0 {
                    add_service_lane(&mut graph, here, east, spacing);
                }
            }

            // Northward segment runs along this column
            if row + 1 < rows {
                let class = line_class(col, cols, center_col);
                let north = node_id(row + 1, col);
                add_segment(&mut graph, &mut rng, here, north, class, spacing);
            }
        }
    }

    tracing::debug!(
        "Generated road network: {}x{} lattice, {} nodes, {} edges",
        rows,
        cols,
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

fn lattice_len(extent: f64, spacing: f64) -> usize {
    (extent / spacing + 1e-9).floor() as usize + 1
}

fn line_class(index: usize, len: usize, center: usize) -> HighwayClass {
    if index == 0 || index + 1 == len {
        HighwayClass::Motorway
    } else if index == center {
        HighwayClass::Trunk
    } else if index % 4 == 0 {
        HighwayClass::Primary
    } else if index % 2 == 0 {
        HighwayClass::Secondary
    } else {
        HighwayClass::Residential
    }
}

/// Two-way road with one slightly displaced interior point
fn add_segment(
    graph: &mut RoadGraph,
    rng: &mut ChaCha8Rng,
    a: NodeId,
    b: NodeId,
    class: HighwayClass,
    spacing: f64,
) {
    let (Some(pa), Some(pb)) = (graph.location(a), graph.location(b)) else {
        return;
    };
    let bend = spacing * 0.05;
    let via = pa
        .midpoint(&pb)
        .offset(rng.gen_range(-bend..=bend), rng.gen_range(-bend..=bend));
    graph.add_two_way(a, b, 0, class, &[via]);
}

/// Slower parallel lane that swings a quarter block south of the main road
fn add_service_lane(graph: &mut RoadGraph, a: NodeId, b: NodeId, spacing: f64) {
    let (Some(pa), Some(pb)) = (graph.location(a), graph.location(b)) else {
        return;
    };
    let swing = spacing * 0.25;
    let via = [pa.offset(-swing, 0.0), pb.offset(-swing, 0.0)];
    graph.add_two_way(a, b, 1, HighwayClass::Service, &via);
}
