//! Core type definitions used throughout the codebase

use geo::HaversineDistance;
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Planar distance in degrees, used for proximity thresholds
    pub fn degree_distance(&self, other: &Self) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        (dlat * dlat + dlon * dlon).sqrt()
    }

    /// Great-circle distance in metres
    pub fn haversine_m(&self, other: &Self) -> f64 {
        Point::from(*self).haversine_distance(&Point::from(*other))
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }

    pub fn offset(&self, dlat: f64, dlon: f64) -> Self {
        Self {
            lat: self.lat + dlat,
            lon: self.lon + dlon,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// `[lat, lon]` pair as Leaflet expects it
    pub fn to_lat_lon(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lon, p.lat)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(p: Point<f64>) -> Self {
        Self::new(p.y(), p.x())
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Axis-aligned bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl GeoBounds {
    pub const fn new(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    pub fn contains(&self, p: &GeoPoint) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lon >= self.south_west.lon
            && p.lon <= self.north_east.lon
    }

    /// True unless north_east lies strictly above and right of south_west
    ///
    /// NaN corners count as empty.
    pub fn is_empty(&self) -> bool {
        !(self.north_east.lat > self.south_west.lat && self.north_east.lon > self.south_west.lon)
    }
}
