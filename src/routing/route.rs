//! Route options presented to the operator

use serde::{Deserialize, Serialize};

use crate::core::types::GeoPoint;
use crate::network::{EdgeKey, NodeId, RoadGraph};
use crate::render::colors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteKind {
    Fastest,
    Alternative,
}

impl RouteKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fastest => "Fastest Route",
            Self::Alternative => "Alternative Route",
        }
    }

    /// Map line and card accent color
    pub fn color(&self) -> &'static str {
        match self {
            Self::Fastest => colors::ROUTE_FASTEST,
            Self::Alternative => colors::ROUTE_ALTERNATIVE,
        }
    }
}

/// Distance and driving time of a path
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub distance_km: f64,
    pub time_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub kind: RouteKind,
    pub path: Vec<NodeId>,
    /// The edge driven for each hop of `path`
    pub edges: Vec<EdgeKey>,
    pub distance_km: f64,
    pub time_min: f64,
}

impl Route {
    pub fn name(&self) -> &'static str {
        self.kind.display_name()
    }

    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    /// One-line summary, e.g. "Fastest Route: 7.4 min, 9.12 km"
    pub fn summary(&self) -> String {
        format!(
            "{}: {:.1} min, {:.2} km",
            self.name(),
            self.time_min,
            self.distance_km
        )
    }

    /// Polyline following the actual road geometry
    pub fn geometry(&self, graph: &RoadGraph) -> Vec<GeoPoint> {
        let mut coords: Vec<GeoPoint> = Vec::new();
        for key in &self.edges {
            let Some(segment) = graph.edge_geometry(key) else {
                continue;
            };
            let skip = usize::from(coords.last() == segment.first());
            coords.extend(segment.into_iter().skip(skip));
        }
        coords
    }
}
