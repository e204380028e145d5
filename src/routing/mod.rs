//! Route search between stations and emergencies

pub mod pathfinding;
pub mod ranking;
pub mod route;

pub use pathfinding::{find_routes, route_metrics, shortest_path};
pub use ranking::{rank_ambulances, AmbulanceRanking};
pub use route::{Route, RouteKind, RouteMetrics};
