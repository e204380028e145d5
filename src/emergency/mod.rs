//! Emergencies and simulated road damage

pub mod damage;
pub mod generator;
pub mod state;

pub use damage::{simulate_damage, DamageState, ImpactZone};
pub use generator::random_location;
pub use state::{Emergency, EmergencySlot};
