//! Map artifact: a self-contained Leaflet HTML page
//!
//! Layers are collected as plain data and embedded as JSON; a short script in
//! the page turns them into Leaflet markers and lines.

use std::fs;
use std::path::Path;

use serde::Serialize;

use super::colors;
use crate::city::{Fleet, Station};
use crate::core::config::CityConfig;
use crate::core::error::Result;
use crate::core::types::GeoPoint;
use crate::emergency::Emergency;
use crate::network::RoadGraph;
use crate::routing::Route;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Icon {
    pub color: &'static str,
    pub icon: &'static str,
    pub prefix: &'static str,
}

impl Icon {
    fn fa(color: &'static str, icon: &'static str) -> Self {
        Self {
            color,
            icon,
            prefix: "fa",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Marker {
        location: [f64; 2],
        popup: String,
        tooltip: String,
        icon: Icon,
    },
    CircleMarker {
        location: [f64; 2],
        radius: f64,
        color: &'static str,
        fill_color: &'static str,
        fill_opacity: f64,
        weight: f64,
        popup: String,
        tooltip: String,
    },
    PolyLine {
        coords: Vec<[f64; 2]>,
        color: &'static str,
        weight: f64,
        opacity: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        dash_array: Option<&'static str>,
        popup: String,
        tooltip: String,
    },
}

impl Layer {
    pub fn tooltip(&self) -> &str {
        match self {
            Self::Marker { tooltip, .. }
            | Self::CircleMarker { tooltip, .. }
            | Self::PolyLine { tooltip, .. } => tooltip,
        }
    }

    pub fn popup(&self) -> &str {
        match self {
            Self::Marker { popup, .. }
            | Self::CircleMarker { popup, .. }
            | Self::PolyLine { popup, .. } => popup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom_start: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// `[[south, west], [north, east]]`
    pub bounds: [[f64; 2]; 2],
}

impl From<&CityConfig> for MapView {
    fn from(city: &CityConfig) -> Self {
        Self {
            center: city.center.to_lat_lon(),
            zoom_start: city.zoom_start,
            min_zoom: city.min_zoom,
            max_zoom: city.max_zoom,
            bounds: [
                city.bounds.south_west.to_lat_lon(),
                city.bounds.north_east.to_lat_lon(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapArtifact {
    view: MapView,
    layers: Vec<Layer>,
}

pub const EMERGENCY_TOOLTIP: &str = "Emergency Call";
pub const BLOCKED_ROAD_TOOLTIP: &str = "Blocked Road";

impl MapArtifact {
    /// Empty base map fitted to the city
    pub fn new(city: &CityConfig) -> Self {
        Self {
            view: MapView::from(city),
            layers: Vec::new(),
        }
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Station marker plus the ambulance parked there
    pub fn add_stations(&mut self, stations: &[Station], fleet: &Fleet) {
        for station in stations {
            let label = escape_html(&station.label());
            let location = station.location.to_lat_lon();

            self.push(Layer::Marker {
                location,
                popup: label.clone(),
                tooltip: label.clone(),
                icon: Icon::fa(colors::STATION_ICON, "home"),
            });

            let Some(ambulance) = fleet.iter().find(|a| a.station == station.id) else {
                continue;
            };
            let name = format!("Ambulance {}", ambulance.id);
            let badge = colors::status_colors(ambulance.status);

            self.push(Layer::CircleMarker {
                location,
                radius: 12.0,
                color: colors::AMBULANCE_RING,
                fill_color: colors::AMBULANCE_RING,
                fill_opacity: 0.3,
                weight: 2.0,
                popup: name.clone(),
                tooltip: name.clone(),
            });
            self.push(Layer::Marker {
                location,
                popup: format!(
                    "<b>{}</b><br>{}<br><span style=\"color: {}\">{}</span>",
                    name, label, badge.fg, ambulance.status
                ),
                tooltip: name,
                icon: Icon::fa(colors::ambulance_icon(ambulance.status), "ambulance"),
            });
        }
    }

    pub fn add_emergency(&mut self, emergency: &Emergency) {
        let location = emergency.location.to_lat_lon();
        let popup = format!("<b>EMERGENCY</b><br>{}", emergency.location);

        self.push(Layer::CircleMarker {
            location,
            radius: 15.0,
            color: colors::EMERGENCY,
            fill_color: colors::EMERGENCY,
            fill_opacity: 0.7,
            weight: 3.0,
            popup: popup.clone(),
            tooltip: EMERGENCY_TOOLTIP.to_string(),
        });
        self.push(Layer::Marker {
            location,
            popup,
            tooltip: EMERGENCY_TOOLTIP.to_string(),
            icon: Icon::fa(colors::EMERGENCY_ICON, "exclamation-triangle"),
        });
    }

    /// Red dashed line per destroyed road
    pub fn add_blocked_roads(&mut self, roads: &[Vec<GeoPoint>]) {
        for coords in roads {
            self.push(Layer::PolyLine {
                coords: coords.iter().map(GeoPoint::to_lat_lon).collect(),
                color: colors::BLOCKED_ROAD,
                weight: 8.0,
                opacity: 1.0,
                dash_array: Some("15, 10"),
                popup: "<b>BLOCKED ROAD</b>".to_string(),
                tooltip: BLOCKED_ROAD_TOOLTIP.to_string(),
            });
        }
    }

    /// Selected route along the road geometry
    pub fn add_route(&mut self, graph: &RoadGraph, route: &Route) {
        let coords: Vec<[f64; 2]> = route
            .geometry(graph)
            .iter()
            .map(GeoPoint::to_lat_lon)
            .collect();
        if coords.is_empty() {
            return;
        }

        self.push(Layer::PolyLine {
            coords,
            color: route.color(),
            weight: 6.0,
            opacity: 0.8,
            dash_array: None,
            popup: format!(
                "<b>{}</b><br>Time: {:.1} min<br>Distance: {:.2} km",
                route.name(),
                route.time_min,
                route.distance_km
            ),
            tooltip: route.summary(),
        });
    }

    pub fn to_html(&self) -> Result<String> {
        // Keep "</script>" inside strings from ending the script element
        let payload = serde_json::to_string(self)?.replace("</", "<\\/");
        Ok(HTML_TEMPLATE.replace("__MAP_PAYLOAD__", &payload))
    }

    /// Write the page to `path`, replacing the previous artifact atomically
    pub fn write(&self, path: &Path) -> Result<()> {
        let html = self.to_html()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        fs::write(&tmp, html)?;
        fs::rename(&tmp, path)?;
        tracing::debug!("Map written to {}", path.display());
        Ok(())
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const HTML_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Ambulance Logistics</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/font-awesome/4.7.0/css/font-awesome.min.css">
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js"></script>
<style>
html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
#map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const cfg = __MAP_PAYLOAD__;
const map = L.map("map", {
  center: cfg.view.center,
  zoom: cfg.view.zoom_start,
  minZoom: cfg.view.min_zoom,
  maxZoom: cfg.view.max_zoom,
  maxBounds: cfg.view.bounds
});
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  attribution: "&copy; OpenStreetMap contributors",
  maxZoom: 19
}).addTo(map);
map.fitBounds(cfg.view.bounds);

for (const layer of cfg.layers) {
  let item;
  switch (layer.type) {
    case "marker":
      item = L.marker(layer.location, {
        icon: L.AwesomeMarkers.icon({
          icon: layer.icon.icon,
          prefix: layer.icon.prefix,
          markerColor: layer.icon.color
        })
      });
      break;
    case "circle_marker":
      item = L.circleMarker(layer.location, {
        radius: layer.radius,
        color: layer.color,
        fill: true,
        fillColor: layer.fill_color,
        fillOpacity: layer.fill_opacity,
        weight: layer.weight
      });
      break;
    case "poly_line":
      item = L.polyline(layer.coords, {
        color: layer.color,
        weight: layer.weight,
        opacity: layer.opacity,
        dashArray: layer.dash_array
      });
      break;
    default:
      continue;
  }
  item.bindPopup(layer.popup);
  item.bindTooltip(layer.tooltip);
  item.addTo(map);
}
</script>
</body>
</html>
"##;
