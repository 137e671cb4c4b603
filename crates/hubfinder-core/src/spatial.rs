//! Great-circle distance and proximity banding.

use crate::models::{GridPoint, PlaceRecord, ProximityCount};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Upper edge of the "near" band, inclusive.
pub const NEAR_BAND_M: f64 = 5_000.0;
/// Upper edge of the "far" band, inclusive. Also the nearby-search radius.
pub const FAR_BAND_M: f64 = 10_000.0;

/// Great-circle distance in meters between two lat/lon pairs in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance between two grid points in meters.
pub fn distance_between(a: &GridPoint, b: &GridPoint) -> f64 {
    haversine_distance(a.lat, a.lon, b.lat, b.lon)
}

/// Which band a distance falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityBand {
    Near,
    Far,
    OutOfRange,
}

pub fn band_for_distance(distance_m: f64) -> ProximityBand {
    if distance_m <= NEAR_BAND_M {
        ProximityBand::Near
    } else if distance_m <= FAR_BAND_M {
        ProximityBand::Far
    } else {
        ProximityBand::OutOfRange
    }
}

/// Bucket place records around `center`. Records without a location and
/// records beyond the far band are not counted.
pub fn count_by_band(center: &GridPoint, places: &[PlaceRecord]) -> ProximityCount {
    let mut count = ProximityCount::default();
    for location in places.iter().filter_map(|place| place.location.as_ref()) {
        match band_for_distance(distance_between(center, location)) {
            ProximityBand::Near => count.count_near += 1,
            ProximityBand::Far => count.count_far += 1,
            ProximityBand::OutOfRange => {}
        }
    }
    count.count_total = count.count_near + count.count_far;
    count
}
