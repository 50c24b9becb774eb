//! Route planning service
//!
//! Uses OSRM for production, a haversine-based mock when no routing
//! engine is configured or in tests.

mod osrm;

pub use osrm::{OsrmClient, OsrmConfig};

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::defaults::AVG_SPEED_MPH;
use crate::services::geo::haversine_miles;
use crate::types::Coordinates;

/// Waypoint names in route order
pub const WAYPOINT_NAMES: [&str; 3] = ["current", "pickup", "dropoff"];

/// One leg of a computed route
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub from_location: String,
    pub to_location: String,
    pub distance_miles: f64,
    pub duration_minutes: f64,
}

/// Complete route through current → pickup → dropoff
#[derive(Debug, Clone)]
pub struct RouteResult {
    /// Exactly two legs, in trip order
    pub legs: Vec<RouteLeg>,
    pub total_distance_miles: f64,
    pub total_duration_minutes: f64,
    /// Encoded polyline for map display (empty for the mock provider)
    pub polyline: String,
}

/// Route provider trait for abstraction (OSRM, mock, etc.)
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Compute the two-leg route current → pickup → dropoff
    async fn plan_route(
        &self,
        current: Coordinates,
        pickup: Coordinates,
        dropoff: Coordinates,
    ) -> Result<RouteResult>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Mock route provider - haversine distance × road coefficient at the
/// planner's fixed average speed. Deterministic and network-free.
pub struct MockRouteProvider {
    /// Straight-line to road distance coefficient
    road_coefficient: f64,
    average_speed_mph: f64,
}

impl Default for MockRouteProvider {
    fn default() -> Self {
        Self {
            road_coefficient: 1.3,
            average_speed_mph: AVG_SPEED_MPH,
        }
    }
}

impl MockRouteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(road_coefficient: f64, average_speed_mph: f64) -> Self {
        Self {
            road_coefficient,
            average_speed_mph,
        }
    }

    fn leg(&self, index: usize, from: Coordinates, to: Coordinates) -> RouteLeg {
        let distance_miles = haversine_miles(&from, &to) * self.road_coefficient;
        RouteLeg {
            from_location: WAYPOINT_NAMES[index].to_string(),
            to_location: WAYPOINT_NAMES[index + 1].to_string(),
            distance_miles,
            duration_minutes: distance_miles / self.average_speed_mph * 60.0,
        }
    }
}

#[async_trait]
impl RouteProvider for MockRouteProvider {
    async fn plan_route(
        &self,
        current: Coordinates,
        pickup: Coordinates,
        dropoff: Coordinates,
    ) -> Result<RouteResult> {
        let legs = vec![self.leg(0, current, pickup), self.leg(1, pickup, dropoff)];

        Ok(RouteResult {
            total_distance_miles: legs.iter().map(|l| l.distance_miles).sum(),
            total_duration_minutes: legs.iter().map(|l| l.duration_minutes).sum(),
            legs,
            polyline: String::new(),
        })
    }

    fn name(&self) -> &str {
        "MockRouting"
    }
}

/// Create a route provider based on configuration
pub fn create_route_provider(osrm_url: Option<String>) -> Box<dyn RouteProvider> {
    match osrm_url {
        Some(url) => {
            info!("Using OSRM routing at {}", url);
            Box::new(OsrmClient::new(OsrmConfig::new(url)))
        }
        None => {
            info!("Using mock routing (OSRM_URL not configured)");
            Box::new(MockRouteProvider::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicago() -> Coordinates {
        Coordinates {
            lat: 41.8781,
            lng: -87.6298,
        }
    }

    fn indianapolis() -> Coordinates {
        Coordinates {
            lat: 39.7684,
            lng: -86.1581,
        }
    }

    fn louisville() -> Coordinates {
        Coordinates {
            lat: 38.2527,
            lng: -85.7585,
        }
    }

    #[tokio::test]
    async fn test_mock_route_has_two_legs() {
        let provider = MockRouteProvider::new();
        let route = provider
            .plan_route(chicago(), indianapolis(), louisville())
            .await
            .unwrap();

        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.legs[0].from_location, "current");
        assert_eq!(route.legs[0].to_location, "pickup");
        assert_eq!(route.legs[1].from_location, "pickup");
        assert_eq!(route.legs[1].to_location, "dropoff");
        assert!(route.polyline.is_empty());
    }

    #[tokio::test]
    async fn test_mock_route_distances_are_plausible() {
        let provider = MockRouteProvider::new();
        let route = provider
            .plan_route(chicago(), indianapolis(), louisville())
            .await
            .unwrap();

        // Chicago→Indianapolis ≈ 165 mi straight line, ≈ 215 mi road
        assert!(
            route.legs[0].distance_miles > 180.0 && route.legs[0].distance_miles < 250.0,
            "got {} miles",
            route.legs[0].distance_miles
        );

        let total: f64 = route.legs.iter().map(|l| l.distance_miles).sum();
        assert!((total - route.total_distance_miles).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_mock_route_duration_matches_speed() {
        let provider = MockRouteProvider::with_params(1.0, 60.0);
        let route = provider
            .plan_route(chicago(), indianapolis(), louisville())
            .await
            .unwrap();

        for leg in &route.legs {
            // 60 mph means miles and minutes coincide
            assert!((leg.duration_minutes - leg.distance_miles).abs() < 1e-6);
        }
    }

    #[test]
    fn test_create_route_provider_without_url_is_mock() {
        let provider = create_route_provider(None);
        assert_eq!(provider.name(), "MockRouting");
    }

    #[test]
    fn test_create_route_provider_with_url_is_osrm() {
        let provider = create_route_provider(Some("http://localhost:5000".to_string()));
        assert_eq!(provider.name(), "OSRM");
    }
}
