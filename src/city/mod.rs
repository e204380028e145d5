//! The fixed fleet: six stations with one ambulance each

pub mod ambulance;
pub mod station;

pub use ambulance::{Ambulance, AmbulanceId, AmbulanceStatus, Fleet};
pub use station::{Station, StationId, STATION_COUNT};
