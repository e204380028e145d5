//! Random emergency placement

use rand::Rng;

use crate::core::types::GeoPoint;

/// Uniform point in the square `center ± radius` degrees
pub fn random_location<R: Rng + ?Sized>(center: &GeoPoint, radius: f64, rng: &mut R) -> GeoPoint {
    center.offset(
        rng.gen_range(-radius..=radius),
        rng.gen_range(-radius..=radius),
    )
}
