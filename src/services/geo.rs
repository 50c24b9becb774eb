//! Geographic calculations

use crate::types::Coordinates;

/// Earth radius in miles
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Calculate Haversine distance between two points in miles
pub fn haversine_miles(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}
