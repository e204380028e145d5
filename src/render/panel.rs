//! Plain-text status board printed by the shell

use crate::city::{Fleet, Station};
use crate::emergency::{DamageState, Emergency};
use crate::routing::{AmbulanceRanking, Route};

pub const NO_ROUTE: &str = "No route available";

/// One card per ambulance: id, home station, status
pub fn ambulance_board(stations: &[Station], fleet: &Fleet) -> String {
    let mut out = String::from("Ambulances\n");
    for ambulance in fleet.iter() {
        let station_name = stations
            .iter()
            .find(|s| s.id == ambulance.station)
            .map(|s| s.name.as_str())
            .unwrap_or("?");
        out.push_str(&format!(
            "  Ambulance {}  Station {} ({:<9})  * {}\n",
            ambulance.id, ambulance.station, station_name, ambulance.status
        ));
    }
    out
}

pub fn emergency_line(emergency: Option<&Emergency>) -> String {
    match emergency {
        Some(e) => format!(
            "Emergency #{} at {} (nearest: Station {})",
            e.sequence, e.location, e.nearest_station
        ),
        None => "No active emergency".to_string(),
    }
}

pub fn damage_line(damage: &DamageState) -> String {
    if damage.is_empty() {
        return "Roads: all open".to_string();
    }
    format!(
        "Roads: {} directions blocked by {} impacts",
        damage.blocked.len(),
        damage.impact_zones.len()
    )
}

/// Route options, marking the selected one
pub fn route_board(routes: &[Route], selected: Option<usize>) -> String {
    if routes.is_empty() {
        return format!("Route Options\n  ! {}\n  All roads are blocked.\n  Try another ambulance.\n", NO_ROUTE);
    }

    let mut out = String::from("Route Options\n");
    for (i, route) in routes.iter().enumerate() {
        let marker = if selected == Some(i) { '>' } else { ' ' };
        out.push_str(&format!(
            "{} {}. {:<17}  {:>5.1} min  {:>6.2} km\n",
            marker,
            i + 1,
            route.name(),
            route.time_min,
            route.distance_km
        ));
    }
    out
}

pub fn ranking_board(rankings: &[AmbulanceRanking]) -> String {
    let mut out = String::from("Suggested ambulances\n");
    for (i, ranking) in rankings.iter().enumerate() {
        let line = match &ranking.fastest {
            Some(route) => format!(
                "  {}. Ambulance {}  {:>5.1} min  {:>6.2} km\n",
                i + 1,
                ranking.ambulance,
                route.time_min,
                route.distance_km
            ),
            None => format!("  {}. Ambulance {}  unreachable\n", i + 1, ranking.ambulance),
        };
        out.push_str(&line);
    }
    out
}
