//! Ambulance stations
//!
//! Stations are created once at startup from the city config and never
//! change afterwards.

use serde::{Deserialize, Serialize};

use crate::core::config::CityConfig;
use crate::core::types::GeoPoint;

pub const STATION_COUNT: usize = 6;

/// Station number, 1-based as shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationId(pub u8);

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub location: GeoPoint,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }

    /// Full display label, e.g. "North Station"
    pub fn label(&self) -> String {
        format!("{} Station", self.name)
    }

    /// Build the six stations around the configured center
    pub fn layout(city: &CityConfig) -> Vec<Station> {
        let c = city.center;
        let o = city.station_offset;
        let placements = [
            ("Central", c),
            ("North", c.offset(o, 0.0)),
            ("South", c.offset(-o, 0.0)),
            ("East", c.offset(0.0, o)),
            ("West", c.offset(0.0, -o)),
            ("Northeast", c.offset(o / 1.5, o / 1.5)),
        ];

        placements
            .into_iter()
            .enumerate()
            .map(|(i, (name, location))| Station::new(StationId(i as u8 + 1), name, location))
            .collect()
    }

    /// Station closest to `point` by straight-line distance
    pub fn nearest<'a>(stations: &'a [Station], point: &GeoPoint) -> Option<&'a Station> {
        stations.iter().min_by(|a, b| {
            a.location
                .degree_distance(point)
                .total_cmp(&b.location.degree_distance(point))
        })
    }
}
