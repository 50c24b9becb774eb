//! Location types

use serde::{Deserialize, Serialize};

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Format for OSRM URL path segments (lng,lat order)
    pub fn to_osrm_string(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

/// A resolved trip waypoint: coordinates plus a display address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            address: address.into(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// Address when known, bare coordinates otherwise
    pub fn display_name(&self) -> String {
        if self.address.trim().is_empty() {
            format!("{:.4}, {:.4}", self.lat, self.lng)
        } else {
            self.address.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osrm_string_is_lng_lat() {
        let chicago = Coordinates {
            lat: 41.8781,
            lng: -87.6298,
        };
        assert_eq!(chicago.to_osrm_string(), "-87.6298,41.8781");
    }

    #[test]
    fn test_display_name_prefers_address() {
        let loc = Location::new(41.8781, -87.6298, "Chicago, IL");
        assert_eq!(loc.display_name(), "Chicago, IL");
    }

    #[test]
    fn test_display_name_falls_back_to_coordinates() {
        let loc = Location::new(41.8781, -87.6298, "  ");
        assert_eq!(loc.display_name(), "41.8781, -87.6298");
    }
}
