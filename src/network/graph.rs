//! Road graph storage and queries
//!
//! Edges are directed and may be parallel: two edges between the same pair of
//! nodes are told apart by their `key`. A two-way street is two edges.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use super::highway::HighwayClass;
use crate::core::error::DispatchError;
use crate::core::types::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Identity of one directed edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub from: NodeId,
    pub to: NodeId,
    pub key: u32,
}

impl EdgeKey {
    pub fn new(from: NodeId, to: NodeId, key: u32) -> Self {
        Self { from, to, key }
    }

    /// The same road driven the other way
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            key: self.key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    pub id: NodeId,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub key: u32,
    pub length_m: f64,
    pub highway: HighwayClass,
    /// Full polyline including both endpoints, when the road is not straight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<GeoPoint>>,
}

impl RoadEdge {
    pub fn edge_key(&self) -> EdgeKey {
        EdgeKey::new(self.from, self.to, self.key)
    }
}

/// On-disk form of the graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<RoadNode>,
    pub edges: Vec<RoadEdge>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct RoadGraph {
    nodes: Vec<RoadNode>,
    edges: Vec<RoadEdge>,
    node_index: AHashMap<NodeId, usize>,
    edge_index: AHashMap<EdgeKey, usize>,
    outgoing: AHashMap<NodeId, Vec<usize>>,
}

/// Rebuild the indices, rejecting anything `add_node`/`add_edge` would drop
impl TryFrom<GraphData> for RoadGraph {
    type Error = DispatchError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        let mut graph = RoadGraph::new();
        for node in data.nodes {
            if graph.node_index.contains_key(&node.id) {
                return Err(DispatchError::InvalidGraph(format!(
                    "duplicate node {}",
                    node.id.0
                )));
            }
            graph.add_node(node.id, node.location);
        }
        for edge in data.edges {
            let key = edge.edge_key();
            if !graph.add_edge(edge) {
                return Err(DispatchError::InvalidGraph(format!(
                    "edge {} -> {} (key {}) has an unknown endpoint or a duplicate key",
                    key.from.0, key.to.0, key.key
                )));
            }
        }
        Ok(graph)
    }
}

impl From<RoadGraph> for GraphData {
    fn from(graph: RoadGraph) -> Self {
        Self {
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing the location of an existing one
    pub fn add_node(&mut self, id: NodeId, location: GeoPoint) {
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].location = location;
            return;
        }
        self.node_index.insert(id, self.nodes.len());
        self.nodes.push(RoadNode { id, location });
    }

    /// Insert a directed edge
    ///
    /// Returns false if an endpoint is unknown or the edge key is taken.
    pub fn add_edge(&mut self, edge: RoadEdge) -> bool {
        let key = edge.edge_key();
        if !self.node_index.contains_key(&edge.from)
            || !self.node_index.contains_key(&edge.to)
            || self.edge_index.contains_key(&key)
        {
            return false;
        }
        let idx = self.edges.len();
        self.edge_index.insert(key, idx);
        self.outgoing.entry(edge.from).or_default().push(idx);
        self.edges.push(edge);
        true
    }

    /// Add both directions of a road; length is measured along the geometry
    ///
    /// `via` holds the interior points of the polyline, if any.
    pub fn add_two_way(
        &mut self,
        a: NodeId,
        b: NodeId,
        key: u32,
        highway: HighwayClass,
        via: &[GeoPoint],
    ) -> bool {
        let (Some(pa), Some(pb)) = (self.location(a), self.location(b)) else {
            return false;
        };

        let mut forward = Vec::with_capacity(via.len() + 2);
        forward.push(pa);
        forward.extend_from_slice(via);
        forward.push(pb);
        let length_m = forward.windows(2).map(|w| w[0].haversine_m(&w[1])).sum();

        let geometry = (!via.is_empty()).then(|| forward.clone());
        let reverse_geometry = geometry.as_ref().map(|g| g.iter().rev().copied().collect());

        let added = self.add_edge(RoadEdge {
            from: a,
            to: b,
            key,
            length_m,
            highway,
            geometry,
        });
        added
            && self.add_edge(RoadEdge {
                from: b,
                to: a,
                key,
                length_m,
                highway,
                geometry: reverse_geometry,
            })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RoadNode> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &RoadEdge> {
        self.edges.iter()
    }

    pub fn location(&self, id: NodeId) -> Option<GeoPoint> {
        self.node_index.get(&id).map(|&idx| self.nodes[idx].location)
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&RoadEdge> {
        self.edge_index.get(key).map(|&idx| &self.edges[idx])
    }

    pub fn has_edge(&self, key: &EdgeKey) -> bool {
        self.edge_index.contains_key(key)
    }

    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = &RoadEdge> {
        self.outgoing
            .get(&node)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.edges[idx])
    }

    /// All parallel edges from `from` to `to`
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = &RoadEdge> {
        self.outgoing(from).filter(move |e| e.to == to)
    }

    /// Node closest to `point` by great-circle distance
    pub fn nearest_node(&self, point: &GeoPoint) -> Option<NodeId> {
        self.nodes
            .iter()
            .min_by(|a, b| {
                a.location
                    .haversine_m(point)
                    .total_cmp(&b.location.haversine_m(point))
            })
            .map(|n| n.id)
    }

    pub fn edge_midpoint(&self, key: &EdgeKey) -> Option<GeoPoint> {
        let a = self.location(key.from)?;
        let b = self.location(key.to)?;
        Some(a.midpoint(&b))
    }

    /// Polyline of an edge: its stored geometry or the straight segment
    /// between its endpoints
    pub fn edge_geometry(&self, key: &EdgeKey) -> Option<Vec<GeoPoint>> {
        let edge = self.edge(key)?;
        if let Some(geometry) = &edge.geometry {
            return Some(geometry.clone());
        }
        Some(vec![self.location(edge.from)?, self.location(edge.to)?])
    }

    /// Major-road edges whose midpoint lies within `max_dist` degrees of `center`
    pub fn major_road_edges(&self, center: &GeoPoint, max_dist: f64) -> Vec<EdgeKey> {
        let major: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|e| e.highway.is_major())
            .map(RoadEdge::edge_key)
            .filter(|key| {
                self.edge_midpoint(key)
                    .is_some_and(|mid| mid.degree_distance(center) <= max_dist)
            })
            .collect();

        tracing::info!(
            "Found {} major roads in center (out of {} total)",
            major.len(),
            self.edges.len()
        );
        major
    }

    /// Edge directions to leave out of routing for the given blocked roads
    ///
    /// Each blocked edge closes itself and its reverse `(to, from, key)`.
    /// Keys not present in the graph are ignored. The second value is how
    /// many directions were actually closed.
    pub fn closed_directions(&self, blocked: &[EdgeKey]) -> (AHashSet<EdgeKey>, usize) {
        let mut closed = AHashSet::new();
        for key in blocked {
            for direction in [*key, key.reversed()] {
                if self.has_edge(&direction) {
                    closed.insert(direction);
                }
            }
        }
        let removed = closed.len();
        (closed, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a -- b -- c in a line, plus a slow parallel a -> b
    fn line_graph() -> RoadGraph {
        let mut graph = RoadGraph::new();
        graph.add_node(NodeId(1), GeoPoint::new(50.0, 36.0));
        graph.add_node(NodeId(2), GeoPoint::new(50.0, 36.01));
        graph.add_node(NodeId(3), GeoPoint::new(50.0, 36.02));
        graph.add_two_way(NodeId(1), NodeId(2), 0, HighwayClass::Primary, &[]);
        graph.add_two_way(NodeId(2), NodeId(3), 0, HighwayClass::Residential, &[]);
        graph.add_two_way(
            NodeId(1),
            NodeId(2),
            1,
            HighwayClass::Service,
            &[GeoPoint::new(50.002, 36.005)],
        );
        graph
    }

    #[test]
    fn test_counts() {
        let graph = line_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn test_add_edge_rejects_unknown_node_and_duplicates() {
        let mut graph = line_graph();
        let edge = RoadEdge {
            from: NodeId(1),
            to: NodeId(99),
            key: 0,
            length_m: 1.0,
            highway: HighwayClass::Service,
            geometry: None,
        };
        assert!(!graph.add_edge(edge));

        let duplicate = graph.edge(&EdgeKey::new(NodeId(1), NodeId(2), 0)).unwrap().clone();
        assert!(!graph.add_edge(duplicate));
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn test_parallel_edges() {
        let graph = line_graph();
        let parallel: Vec<_> = graph.edges_between(NodeId(1), NodeId(2)).collect();
        assert_eq!(parallel.len(), 2);

        let detour = graph.edge(&EdgeKey::new(NodeId(1), NodeId(2), 1)).unwrap();
        let direct = graph.edge(&EdgeKey::new(NodeId(1), NodeId(2), 0)).unwrap();
        assert!(detour.length_m > direct.length_m);
    }

    #[test]
    fn test_reverse_geometry() {
        let graph = line_graph();
        let forward = graph.edge_geometry(&EdgeKey::new(NodeId(1), NodeId(2), 1)).unwrap();
        let backward = graph.edge_geometry(&EdgeKey::new(NodeId(2), NodeId(1), 1)).unwrap();
        assert_eq!(forward.len(), 3);
        assert_eq!(forward.first(), backward.last());
        assert_eq!(forward[1], backward[1]);
    }

    #[test]
    fn test_straight_geometry_falls_back_to_endpoints() {
        let graph = line_graph();
        let geometry = graph.edge_geometry(&EdgeKey::new(NodeId(2), NodeId(3), 0)).unwrap();
        assert_eq!(
            geometry,
            vec![GeoPoint::new(50.0, 36.01), GeoPoint::new(50.0, 36.02)]
        );
    }

    #[test]
    fn test_nearest_node() {
        let graph = line_graph();
        assert_eq!(graph.nearest_node(&GeoPoint::new(50.001, 36.018)), Some(NodeId(3)));
        assert_eq!(RoadGraph::new().nearest_node(&GeoPoint::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_major_road_edges() {
        let graph = line_graph();
        let major = graph.major_road_edges(&GeoPoint::new(50.0, 36.005), 0.01);
        // Only the primary road, in both directions
        assert_eq!(major.len(), 2);
        assert!(major.contains(&EdgeKey::new(NodeId(1), NodeId(2), 0)));
        assert!(major.contains(&EdgeKey::new(NodeId(2), NodeId(1), 0)));
    }

    #[test]
    fn test_closed_directions_are_symmetric() {
        let graph = line_graph();
        let (closed, removed) = graph.closed_directions(&[
            EdgeKey::new(NodeId(2), NodeId(3), 0),
            EdgeKey::new(NodeId(3), NodeId(2), 0),
            EdgeKey::new(NodeId(1), NodeId(3), 0),
        ]);
        assert_eq!(removed, 2);
        assert!(closed.contains(&EdgeKey::new(NodeId(2), NodeId(3), 0)));
        assert!(closed.contains(&EdgeKey::new(NodeId(3), NodeId(2), 0)));
    }

    #[test]
    fn test_serde_round_trip_rebuilds_indices() {
        let graph = line_graph();
        let json = serde_json::to_string(&graph).unwrap();
        let restored: RoadGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.edge_count(), 6);
        assert_eq!(restored.edges_between(NodeId(1), NodeId(2)).count(), 2);
        assert_eq!(restored.location(NodeId(3)), graph.location(NodeId(3)));
    }

    #[test]
    fn test_deserialize_rejects_dangling_and_duplicate_edges() {
        let dangling = r#"{
            "nodes": [{"id": 1, "location": {"lat": 50.0, "lon": 36.0}}],
            "edges": [{"from": 1, "to": 99, "key": 0, "length_m": 10.0, "highway": "primary"}]
        }"#;
        assert!(serde_json::from_str::<RoadGraph>(dangling).is_err());

        let mut data = GraphData::from(line_graph());
        let duplicate = data.edges[0].clone();
        data.edges.push(duplicate);
        let json = serde_json::to_string(&data).unwrap();
        assert!(serde_json::from_str::<RoadGraph>(&json).is_err());

        let mut data = GraphData::from(line_graph());
        let node = data.nodes[0];
        data.nodes.push(node);
        let json = serde_json::to_string(&data).unwrap();
        assert!(serde_json::from_str::<RoadGraph>(&json).is_err());
    }
}
