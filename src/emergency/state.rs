//! Single active emergency
//!
//! The slot holds at most one emergency. Creating a new one always succeeds
//! and discards whatever was there before.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::city::StationId;
use crate::core::types::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emergency {
    pub id: Uuid,
    /// 1 for the first emergency of the session
    pub sequence: u64,
    pub location: GeoPoint,
    pub created_at: SystemTime,
    /// Closest station by straight-line distance
    pub nearest_station: StationId,
}

#[derive(Debug, Default)]
pub struct EmergencySlot {
    current: Option<Emergency>,
    issued: u64,
}

impl EmergencySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new emergency
    ///
    /// Returns the new emergency together with the one it replaced.
    pub fn create(
        &mut self,
        location: GeoPoint,
        nearest_station: StationId,
    ) -> (&Emergency, Option<Emergency>) {
        self.issued += 1;
        let previous = self.current.take();
        let current = self.current.insert(Emergency {
            id: Uuid::new_v4(),
            sequence: self.issued,
            location,
            created_at: SystemTime::now(),
            nearest_station,
        });
        (&*current, previous)
    }

    pub fn current(&self) -> Option<&Emergency> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn clear(&mut self) -> Option<Emergency> {
        self.current.take()
    }

    /// Number of emergencies created so far, including replaced ones
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
