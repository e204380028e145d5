//! Ambulances and their status board

use serde::{Deserialize, Serialize};

use super::station::{Station, StationId};

/// Ambulance number, 1-based; ambulance n is based at station n
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AmbulanceId(pub u8);

impl std::fmt::Display for AmbulanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AmbulanceStatus {
    #[default]
    Available,
    Busy,
}

impl std::fmt::Display for AmbulanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => f.write_str("Available"),
            Self::Busy => f.write_str("Busy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ambulance {
    pub id: AmbulanceId,
    pub station: StationId,
    pub status: AmbulanceStatus,
}

impl Ambulance {
    pub fn new(id: AmbulanceId, station: StationId) -> Self {
        Self {
            id,
            station,
            status: AmbulanceStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == AmbulanceStatus::Available
    }
}

/// One ambulance per station
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fleet {
    ambulances: Vec<Ambulance>,
}

impl Fleet {
    pub fn for_stations(stations: &[Station]) -> Self {
        Self {
            ambulances: stations
                .iter()
                .map(|s| Ambulance::new(AmbulanceId(s.id.0), s.id))
                .collect(),
        }
    }

    pub fn get(&self, id: AmbulanceId) -> Option<&Ambulance> {
        self.ambulances.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ambulance> {
        self.ambulances.iter()
    }

    pub fn len(&self) -> usize {
        self.ambulances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ambulances.is_empty()
    }

    /// Mark `id` busy and every other ambulance available
    ///
    /// Returns false (and changes nothing) if `id` is not in the fleet.
    pub fn dispatch(&mut self, id: AmbulanceId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        for ambulance in &mut self.ambulances {
            ambulance.status = if ambulance.id == id {
                AmbulanceStatus::Busy
            } else {
                AmbulanceStatus::Available
            };
        }
        true
    }

    pub fn release_all(&mut self) {
        for ambulance in &mut self.ambulances {
            ambulance.status = AmbulanceStatus::Available;
        }
    }

    pub fn busy(&self) -> Option<&Ambulance> {
        self.ambulances.iter().find(|a| a.status == AmbulanceStatus::Busy)
    }
}
