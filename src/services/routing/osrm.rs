//! OSRM routing engine client
//!
//! OSRM API documentation:
//! https://project-osrm.org/docs/v5.24.0/api/

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{RouteLeg, RouteProvider, RouteResult, WAYPOINT_NAMES};
use crate::types::Coordinates;

const METERS_TO_MILES: f64 = 0.000_621_371;
const SECONDS_TO_MINUTES: f64 = 1.0 / 60.0;

/// OSRM client configuration
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server (e.g. "http://router.project-osrm.org")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl OsrmConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// OSRM routing client
pub struct OsrmClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent("RoadLog/1.0 (ELD trip planner)")
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build the route request URL for the three waypoints
    fn build_route_url(
        &self,
        current: Coordinates,
        pickup: Coordinates,
        dropoff: Coordinates,
    ) -> String {
        format!(
            "{}/route/v1/driving/{};{};{}?overview=full&geometries=polyline&steps=false&annotations=false",
            self.config.base_url,
            current.to_osrm_string(),
            pickup.to_osrm_string(),
            dropoff.to_osrm_string()
        )
    }
}

#[async_trait]
impl RouteProvider for OsrmClient {
    async fn plan_route(
        &self,
        current: Coordinates,
        pickup: Coordinates,
        dropoff: Coordinates,
    ) -> Result<RouteResult> {
        let url = self.build_route_url(current, pickup, dropoff);

        debug!("Requesting route from OSRM");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send route request to OSRM")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OSRM returned error {}: {}", status, body);
        }

        let route_response: OsrmRouteResponse = response
            .json()
            .await
            .context("Failed to parse OSRM response")?;

        if route_response.code != "Ok" {
            anyhow::bail!("OSRM returned code {:?}", route_response.code);
        }

        let route = route_response
            .routes
            .into_iter()
            .next()
            .context("OSRM response contained no routes")?;

        if route.legs.len() != WAYPOINT_NAMES.len() - 1 {
            anyhow::bail!(
                "expected {} route legs, got {}",
                WAYPOINT_NAMES.len() - 1,
                route.legs.len()
            );
        }

        let legs: Vec<RouteLeg> = route
            .legs
            .iter()
            .enumerate()
            .map(|(i, leg)| RouteLeg {
                from_location: WAYPOINT_NAMES[i].to_string(),
                to_location: WAYPOINT_NAMES[i + 1].to_string(),
                distance_miles: leg.distance * METERS_TO_MILES,
                duration_minutes: leg.duration * SECONDS_TO_MINUTES,
            })
            .collect();

        debug!(
            "Received OSRM route: {:.1} miles over {} legs",
            route.distance * METERS_TO_MILES,
            legs.len()
        );

        Ok(RouteResult {
            legs,
            total_distance_miles: route.distance * METERS_TO_MILES,
            total_duration_minutes: route.duration * SECONDS_TO_MINUTES,
            polyline: route.geometry,
        })
    }

    fn name(&self) -> &str {
        "OSRM"
    }
}

// OSRM API types

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Total distance in meters
    distance: f64,
    /// Total duration in seconds
    duration: f64,
    /// Encoded polyline
    #[serde(default)]
    geometry: String,
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
}
