//! Dispatch configuration with documented constants
//!
//! All tunable numbers live here. Defaults reproduce the Kharkiv scenario;
//! any section can be overridden from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{DispatchError, Result};
use super::types::{GeoBounds, GeoPoint};

/// Kharkiv city center
pub const KHARKIV_CENTER: GeoPoint = GeoPoint::new(49.9808, 36.2527);

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub city: CityConfig,
    pub emergency: EmergencyConfig,
    pub damage: DamageConfig,
    pub routing: RoutingConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Map center; stations and emergencies are placed relative to it
    pub center: GeoPoint,

    /// Area the map view is fitted and clamped to
    pub bounds: GeoBounds,

    /// Distance in degrees between the central station and the outer ones
    ///
    /// The northeast station sits at `offset / 1.5` on both axes.
    pub station_offset: f64,

    pub zoom_start: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            center: KHARKIV_CENTER,
            bounds: GeoBounds::new(GeoPoint::new(49.93, 36.15), GeoPoint::new(50.03, 36.35)),
            station_offset: 0.025,
            zoom_start: 12,
            min_zoom: 11,
            max_zoom: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmergencyConfig {
    /// Emergencies spawn uniformly within `center ± spawn_radius` degrees
    pub spawn_radius: f64,
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self { spawn_radius: 0.03 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    /// Inclusive range for the number of impacts per damage event
    pub min_impacts: u32,
    pub max_impacts: u32,

    /// Impacts land within `center ± impact_radius` degrees
    pub impact_radius: f64,

    /// Major roads whose midpoint lies within this many degrees of an impact
    /// are candidates for blocking
    pub block_radius: f64,

    /// Inclusive range for how many of the closest candidates get blocked
    pub min_roads_per_impact: usize,
    pub max_roads_per_impact: usize,

    /// Only major roads within this many degrees of the center can be damaged
    pub major_road_radius: f64,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            min_impacts: 3,
            max_impacts: 5,
            impact_radius: 0.02,
            block_radius: 0.008,
            min_roads_per_impact: 2,
            max_roads_per_impact: 4,
            major_road_radius: 0.015,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// An alternative route is only searched when the fastest path has more
    /// nodes than this
    pub alternative_min_nodes: usize,

    /// Speed on motorway, trunk and primary roads (km/h)
    pub major_speed_kmh: f64,

    /// Speed on every other road (km/h)
    pub minor_speed_kmh: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            alternative_min_nodes: 10,
            major_speed_kmh: 80.0,
            minor_speed_kmh: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Seed for the synthetic road network
    pub seed: u64,

    /// Lattice spacing in degrees
    pub spacing: f64,

    /// Maximum random displacement of a lattice node, as a fraction of spacing
    pub jitter: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            spacing: 0.004,
            jitter: 0.2,
        }
    }
}

impl DispatchConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing sections and fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate().map_err(DispatchError::ConfigError)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let bounds = &self.city.bounds;
        if !self.city.center.is_finite()
            || !bounds.south_west.is_finite()
            || !bounds.north_east.is_finite()
        {
            return Err("city.center and city.bounds must be finite".into());
        }
        if self.city.bounds.is_empty() {
            return Err("city.bounds must have north_east above and right of south_west".into());
        }

        if self.city.min_zoom > self.city.zoom_start || self.city.zoom_start > self.city.max_zoom {
            return Err(format!(
                "zoom levels must satisfy min_zoom ({}) <= zoom_start ({}) <= max_zoom ({})",
                self.city.min_zoom, self.city.zoom_start, self.city.max_zoom
            ));
        }

        if !positive(self.city.station_offset) || !positive(self.emergency.spawn_radius) {
            return Err("station_offset and spawn_radius must be positive".into());
        }

        let d = &self.damage;
        if d.min_impacts > d.max_impacts {
            return Err(format!(
                "damage.min_impacts ({}) should be <= damage.max_impacts ({})",
                d.min_impacts, d.max_impacts
            ));
        }
        if d.min_roads_per_impact > d.max_roads_per_impact {
            return Err(format!(
                "damage.min_roads_per_impact ({}) should be <= damage.max_roads_per_impact ({})",
                d.min_roads_per_impact, d.max_roads_per_impact
            ));
        }
        if !positive(d.impact_radius) || !positive(d.block_radius) || !positive(d.major_road_radius)
        {
            return Err("damage radii must be positive".into());
        }

        if !positive(self.routing.major_speed_kmh) || !positive(self.routing.minor_speed_kmh) {
            return Err("Speeds must be positive".into());
        }

        if !positive(self.network.spacing) {
            return Err("network.spacing must be positive".into());
        }
        if !(0.0..0.5).contains(&self.network.jitter) {
            return Err(format!(
                "network.jitter ({}) must be in [0, 0.5)",
                self.network.jitter
            ));
        }

        Ok(())
    }
}

/// Finite and strictly above zero; NaN fails
fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}
