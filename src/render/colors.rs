//! Color definitions for map layers and status badges

use crate::city::AmbulanceStatus;

/// Marker icon colors (named palette of the marker plugin)
pub const STATION_ICON: &str = "blue";
pub const AMBULANCE_ICON: &str = "red";
pub const BUSY_AMBULANCE_ICON: &str = "orange";
pub const EMERGENCY_ICON: &str = "red";

/// Circle and line colors
pub const AMBULANCE_RING: &str = "#ff0000";
pub const EMERGENCY: &str = "#ff0000";
pub const BLOCKED_ROAD: &str = "#ff0000";
pub const ROUTE_FASTEST: &str = "#00c853";
pub const ROUTE_ALTERNATIVE: &str = "#ffa726";

/// Foreground and background of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeColors {
    pub fg: &'static str,
    pub bg: &'static str,
}

pub fn status_colors(status: AmbulanceStatus) -> BadgeColors {
    match status {
        AmbulanceStatus::Available => BadgeColors {
            fg: "#23a55a",
            bg: "#1a3a2a",
        },
        AmbulanceStatus::Busy => BadgeColors {
            fg: "#f23f43",
            bg: "#3a1a1a",
        },
    }
}

/// Marker icon color for an ambulance
pub fn ambulance_icon(status: AmbulanceStatus) -> &'static str {
    match status {
        AmbulanceStatus::Available => AMBULANCE_ICON,
        AmbulanceStatus::Busy => BUSY_AMBULANCE_ICON,
    }
}
