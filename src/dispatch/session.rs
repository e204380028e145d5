//! Dispatch session
//!
//! Owns every piece of mutable state: the active emergency, ambulance
//! statuses, road damage, computed routes and the operator's selections.
//! All transitions happen here so the shell stays a thin input loop.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::log::{EventLog, LogCategory};
use crate::city::{Ambulance, AmbulanceId, Fleet, Station, StationId};
use crate::core::config::DispatchConfig;
use crate::core::error::{DispatchError, Result};
use crate::core::types::GeoPoint;
use crate::emergency::{random_location, simulate_damage, DamageState, Emergency, EmergencySlot};
use crate::network::{EdgeKey, RoadGraph};
use crate::render::MapArtifact;
use crate::routing::{find_routes, rank_ambulances, AmbulanceRanking, Route};

pub struct DispatchSession {
    config: DispatchConfig,
    graph: RoadGraph,
    major_edges: Vec<EdgeKey>,
    stations: Vec<Station>,
    fleet: Fleet,
    emergency: EmergencySlot,
    damage: DamageState,
    routes: Vec<Route>,
    selected_ambulance: Option<AmbulanceId>,
    selected_route: Option<usize>,
    rng: ChaCha8Rng,
    log: EventLog,
}

/// Serializable summary of the session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub emergency: Option<Emergency>,
    pub emergencies_issued: u64,
    pub ambulances: Vec<Ambulance>,
    pub selected_ambulance: Option<AmbulanceId>,
    pub routes: Vec<Route>,
    pub selected_route: Option<usize>,
    pub blocked_directions: usize,
    pub impacts: usize,
}

impl DispatchSession {
    pub fn new(config: DispatchConfig, graph: RoadGraph, seed: u64) -> Self {
        let stations = Station::layout(&config.city);
        let fleet = Fleet::for_stations(&stations);
        let major_edges =
            graph.major_road_edges(&config.city.center, config.damage.major_road_radius);
        tracing::info!(
            "Loaded: {} edges, {} major roads",
            graph.edge_count(),
            major_edges.len()
        );

        Self {
            config,
            graph,
            major_edges,
            stations,
            fleet,
            emergency: EmergencySlot::new(),
            damage: DamageState::default(),
            routes: Vec::new(),
            selected_ambulance: None,
            selected_route: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            log: EventLog::new(),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn emergency(&self) -> Option<&Emergency> {
        self.emergency.current()
    }

    pub fn damage(&self) -> &DamageState {
        &self.damage
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn selected_ambulance(&self) -> Option<AmbulanceId> {
        self.selected_ambulance
    }

    pub fn selected_route(&self) -> Option<&Route> {
        self.selected_route.and_then(|i| self.routes.get(i))
    }

    pub fn selected_route_index(&self) -> Option<usize> {
        self.selected_route
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Replace the active emergency with a new random one
    ///
    /// Clears the ambulance and route selection and frees every ambulance.
    pub fn generate_emergency(&mut self) -> &Emergency {
        let location = random_location(
            &self.config.city.center,
            self.config.emergency.spawn_radius,
            &mut self.rng,
        );
        let nearest = Station::nearest(&self.stations, &location)
            .map(|s| s.id)
            .unwrap_or(StationId(1));

        self.fleet.release_all();
        self.selected_ambulance = None;
        self.routes.clear();
        self.selected_route = None;

        tracing::info!("Emergency at: {}", location);
        self.log
            .log(format!("Emergency at {}", location), LogCategory::Emergency);

        let (current, previous) = self.emergency.create(location, nearest);
        if let Some(previous) = previous {
            tracing::debug!("Replaced emergency #{}", previous.sequence);
        }
        current
    }

    /// Send an ambulance to the active emergency and compute its routes
    ///
    /// The fastest route, if any, becomes the selected route.
    pub fn select_ambulance(&mut self, id: AmbulanceId) -> Result<&[Route]> {
        let target = self
            .emergency
            .current()
            .map(|e| e.location)
            .ok_or(DispatchError::NoActiveEmergency)?;
        let station = self
            .fleet
            .get(id)
            .and_then(|a| self.stations.iter().find(|s| s.id == a.station))
            .ok_or(DispatchError::UnknownAmbulance(id))?;
        let from = station.location;

        self.fleet.dispatch(id);
        self.selected_ambulance = Some(id);
        self.recompute_routes(from, target);

        self.log.log(
            format!("Ambulance {} dispatched, {} route(s)", id, self.routes.len()),
            LogCategory::Dispatch,
        );
        Ok(&self.routes)
    }

    /// Choose which computed route is shown; `index` is 0-based
    pub fn select_route(&mut self, index: usize) -> Result<&Route> {
        let route = self
            .routes
            .get(index)
            .ok_or(DispatchError::UnknownRoute(index + 1))?;
        self.selected_route = Some(index);
        self.log
            .log(format!("Selected {}", route.summary()), LogCategory::Routing);
        Ok(route)
    }

    /// Replace road damage with a fresh damage event
    ///
    /// Returns false when there are no major roads to damage. If an
    /// ambulance is already assigned, its routes are recomputed.
    pub fn simulate_damage(&mut self) -> bool {
        let Some(damage) = simulate_damage(
            &self.graph,
            &self.major_edges,
            &self.config.city.center,
            &self.config.damage,
            &mut self.rng,
        ) else {
            return false;
        };
        self.damage = damage;
        self.log.log(
            format!(
                "{} impacts, {} roads blocked",
                self.damage.impact_zones.len(),
                self.damage.blocked.len()
            ),
            LogCategory::Damage,
        );

        let assignment = self.emergency.current().zip(self.selected_ambulance);
        if let Some((emergency, id)) = assignment {
            let target = emergency.location;
            let from = self
                .fleet
                .get(id)
                .and_then(|a| self.stations.iter().find(|s| s.id == a.station))
                .map(|s| s.location);
            if let Some(from) = from {
                self.recompute_routes(from, target);
            }
        }
        true
    }

    /// Every ambulance ranked by travel time to the active emergency
    pub fn suggest_ambulances(&self) -> Result<Vec<AmbulanceRanking>> {
        let target = self
            .emergency
            .current()
            .ok_or(DispatchError::NoActiveEmergency)?
            .location;
        Ok(rank_ambulances(
            &self.graph,
            &self.stations,
            &target,
            &self.damage.blocked,
            &self.config.routing,
        ))
    }

    /// Build the map artifact for the current state
    pub fn render_map(&self) -> MapArtifact {
        let mut map = MapArtifact::new(&self.config.city);
        map.add_stations(&self.stations, &self.fleet);
        map.add_blocked_roads(&self.damage.blocked_geometry);
        if let Some(emergency) = self.emergency.current() {
            map.add_emergency(emergency);
        }
        if let Some(route) = self.selected_route() {
            map.add_route(&self.graph, route);
        }
        map
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            emergency: self.emergency.current().cloned(),
            emergencies_issued: self.emergency.issued(),
            ambulances: self.fleet.iter().cloned().collect(),
            selected_ambulance: self.selected_ambulance,
            routes: self.routes.clone(),
            selected_route: self.selected_route,
            blocked_directions: self.damage.blocked.len(),
            impacts: self.damage.impact_zones.len(),
        }
    }

    fn recompute_routes(&mut self, from: GeoPoint, to: GeoPoint) {
        self.routes = find_routes(
            &self.graph,
            &from,
            &to,
            &self.damage.blocked,
            &self.config.routing,
        );
        self.selected_route = (!self.routes.is_empty()).then_some(0);
        tracing::info!("Found {} routes", self.routes.len());
    }
}
