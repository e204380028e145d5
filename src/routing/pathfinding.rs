//! Ambulance pathfinding with blocked road avoidance

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;

use super::route::{Route, RouteKind, RouteMetrics};
use crate::core::config::RoutingConfig;
use crate::core::types::GeoPoint;
use crate::network::{EdgeKey, NodeId, RoadEdge, RoadGraph};

/// Dijkstra by edge length, skipping `closed` edge directions
pub fn shortest_path(
    graph: &RoadGraph,
    start: NodeId,
    goal: NodeId,
    closed: &AHashSet<EdgeKey>,
) -> Option<Vec<NodeId>> {
    graph.location(start)?;
    graph.location(goal)?;

    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<NodeId, NodeId> = AHashMap::new();
    let mut dist: AHashMap<NodeId, f64> = AHashMap::new();
    let mut settled: AHashSet<NodeId> = AHashSet::new();

    dist.insert(start, 0.0);
    open_set.push(Reverse((OrderedFloat(0.0), start)));

    while let Some(Reverse((OrderedFloat(d), current))) = open_set.pop() {
        if current == goal {
            let mut path = vec![goal];
            let mut node = goal;
            while let Some(&prev) = came_from.get(&node) {
                path.push(prev);
                node = prev;
            }
            path.reverse();
            return Some(path);
        }

        if !settled.insert(current) {
            continue;
        }

        for edge in graph.outgoing(current) {
            if settled.contains(&edge.to) || closed.contains(&edge.edge_key()) {
                continue;
            }
            let tentative = d + edge.length_m;
            if tentative < *dist.get(&edge.to).unwrap_or(&f64::INFINITY) {
                dist.insert(edge.to, tentative);
                came_from.insert(edge.to, current);
                open_set.push(Reverse((OrderedFloat(tentative), edge.to)));
            }
        }
    }

    None
}

/// Shortest open edge for each hop of `path`
///
/// Hops with no open edge are left out.
fn hop_edges<'a>(
    graph: &'a RoadGraph,
    path: &[NodeId],
    closed: &AHashSet<EdgeKey>,
) -> Vec<&'a RoadEdge> {
    path.windows(2)
        .filter_map(|hop| {
            graph
                .edges_between(hop[0], hop[1])
                .filter(|e| !closed.contains(&e.edge_key()))
                .min_by(|a, b| a.length_m.total_cmp(&b.length_m))
        })
        .collect()
}

/// Distance (km) and time (min) for a path
pub fn route_metrics(
    graph: &RoadGraph,
    path: &[NodeId],
    closed: &AHashSet<EdgeKey>,
    routing: &RoutingConfig,
) -> RouteMetrics {
    metrics_for(&hop_edges(graph, path, closed), routing)
}

fn metrics_for(edges: &[&RoadEdge], routing: &RoutingConfig) -> RouteMetrics {
    let mut distance_m = 0.0;
    let mut time_hours = 0.0;
    for edge in edges {
        distance_m += edge.length_m;
        time_hours += (edge.length_m / 1000.0) / edge.highway.speed_kmh(routing);
    }
    RouteMetrics {
        distance_km: distance_m / 1000.0,
        time_min: time_hours * 60.0,
    }
}

fn build_route(
    graph: &RoadGraph,
    kind: RouteKind,
    path: Vec<NodeId>,
    closed: &AHashSet<EdgeKey>,
    routing: &RoutingConfig,
) -> Route {
    let edges = hop_edges(graph, &path, closed);
    let metrics = metrics_for(&edges, routing);
    Route {
        kind,
        edges: edges.iter().map(|e| e.edge_key()).collect(),
        path,
        distance_km: metrics.distance_km,
        time_min: metrics.time_min,
    }
}

/// Fastest route from `from` to `to`, plus an alternative when one exists
///
/// Both coordinates snap to their nearest graph node. Blocked edges are
/// closed in both directions. The alternative is searched only for paths
/// longer than `routing.alternative_min_nodes` nodes, by closing the middle
/// third of the fastest path; it is kept only if it differs.
pub fn find_routes(
    graph: &RoadGraph,
    from: &GeoPoint,
    to: &GeoPoint,
    blocked: &[EdgeKey],
    routing: &RoutingConfig,
) -> Vec<Route> {
    let (Some(start), Some(goal)) = (graph.nearest_node(from), graph.nearest_node(to)) else {
        return Vec::new();
    };

    let (closed, removed) = graph.closed_directions(blocked);
    tracing::debug!(
        "Removed {} edge directions from graph ({} blocked roads)",
        removed,
        blocked.len()
    );

    let Some(path) = shortest_path(graph, start, goal, &closed) else {
        tracing::warn!("No path found - all routes blocked!");
        return Vec::new();
    };

    let fastest = build_route(graph, RouteKind::Fastest, path, &closed, routing);
    let mut routes = vec![fastest];

    if let Some(alternative) = alternative_route(graph, &routes[0], start, goal, &closed, routing)
    {
        routes.push(alternative);
    }

    routes
}

fn alternative_route(
    graph: &RoadGraph,
    fastest: &Route,
    start: NodeId,
    goal: NodeId,
    closed: &AHashSet<EdgeKey>,
    routing: &RoutingConfig,
) -> Option<Route> {
    let path = &fastest.path;
    if path.len() <= routing.alternative_min_nodes {
        return None;
    }

    let mid_start = path.len() / 3;
    let mid_end = (2 * path.len() / 3).min(path.len() - 1);

    let mut detour_closed = closed.clone();
    for hop in path[mid_start..=mid_end].windows(2) {
        detour_closed.extend(graph.edges_between(hop[0], hop[1]).map(RoadEdge::edge_key));
    }

    let alt_path = shortest_path(graph, start, goal, &detour_closed)?;
    if alt_path == *path {
        return None;
    }

    // Measured against the damaged graph only, like the fastest route
    Some(build_route(
        graph,
        RouteKind::Alternative,
        alt_path,
        closed,
        routing,
    ))
}
