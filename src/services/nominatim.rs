//! Nominatim geocoding client

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::Coordinates;

/// Nominatim search result
#[derive(Debug, Deserialize)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct NominatimReverseAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NominatimReverseResult {
    pub display_name: String,
    pub address: Option<NominatimReverseAddress>,
}

/// A geocoded place: coordinates plus the provider's display name
#[derive(Debug, Clone)]
pub struct GeocodedPlace {
    pub coordinates: Coordinates,
    pub display_name: String,
}

/// Nominatim geocoding client
pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimClient {
    /// Create a new client
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("RoadLog/1.0 (ELD trip planner)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.to_string(),
            client,
        }
    }

    /// Geocode a free-form address. Searches are restricted to the US,
    /// where the planner's routes live.
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodedPlace>> {
        let url = format!(
            "{}/search?q={}&format=json&countrycodes=us&limit=1",
            self.base_url,
            urlencoding::encode(address)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send geocoding request")?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        if let Some(result) = results.first() {
            let lat: f64 = result.lat.parse().context("Invalid latitude")?;
            let lng: f64 = result.lon.parse().context("Invalid longitude")?;

            Ok(Some(GeocodedPlace {
                coordinates: Coordinates { lat, lng },
                display_name: result.display_name.clone(),
            }))
        } else {
            Ok(None)
        }
    }

    /// Reverse geocode coordinates to a short "City, State" label,
    /// falling back to the provider's display name.
    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Option<String>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, lat, lng
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send reverse geocoding request")?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let result: NominatimReverseResult = response
            .json()
            .await
            .context("Failed to parse reverse geocoding response")?;

        let address = result.address.unwrap_or_default();
        let city = address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.county);

        match (city, address.state) {
            (Some(city), Some(state)) => Ok(Some(format!("{}, {}", city, state))),
            _ => Ok(Some(result.display_name)),
        }
    }
}
