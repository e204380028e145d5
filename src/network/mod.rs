//! Road network: a directed multigraph of drivable roads

pub mod generation;
pub mod graph;
pub mod highway;
pub mod loader;

pub use generation::generate_network;
pub use graph::{EdgeKey, NodeId, RoadEdge, RoadGraph, RoadNode};
pub use highway::HighwayClass;
pub use loader::{load_graph, load_or_generate, save_graph};
