//! Geocoding abstraction layer.
//!
//! Two implementations sit behind the [`Geocoder`] trait:
//! - `MockGeocoder` for tests and development: deterministic, no network.
//! - `NominatimGeocoder` for production: wraps the Nominatim client
//!   behind a rate limiter honoring the public API's 1 req/s policy.
//!
//! Selected via the `GEOCODER_BACKEND` configuration value.

use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::Config;
use crate::services::nominatim::{GeocodedPlace, NominatimClient};
use crate::types::Coordinates;

/// Geocoder trait - abstraction for all geocoding implementations
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode a free-form address. Returns None when the address
    /// cannot be resolved.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedPlace>>;

    /// Reverse geocode coordinates to a display label
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<String>>;

    /// Implementation name for logging
    fn name(&self) -> &'static str;
}

/// Create a geocoder from configuration
pub fn create_geocoder(config: &Config) -> Box<dyn Geocoder> {
    match config.geocoder_backend.as_str() {
        "mock" => {
            info!("Using mock geocoder");
            Box::new(MockGeocoder::new())
        }
        _ => {
            info!("Using Nominatim geocoder at {}", config.nominatim_url);
            Box::new(NominatimGeocoder::new(&config.nominatim_url))
        }
    }
}

// ==========================================================================
// MockGeocoder
// ==========================================================================

/// Mock geocoder - returns deterministic fake coordinates
pub struct MockGeocoder;

impl MockGeocoder {
    pub fn new() -> Self {
        Self
    }

    /// Hash the address into coordinates inside the continental US,
    /// away from the coasts so mock routes stay on plausible land.
    fn hash_to_coordinates(address: &str) -> Coordinates {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        address.hash(&mut hasher);
        let hash = hasher.finish();

        const LAT_MIN: f64 = 33.0;
        const LAT_MAX: f64 = 45.0;
        const LNG_MIN: f64 = -115.0;
        const LNG_MAX: f64 = -80.0;

        let lat_normalized = ((hash >> 32) as f64) / (u32::MAX as f64);
        let lng_normalized = ((hash & 0xFFFF_FFFF) as f64) / (u32::MAX as f64);

        Coordinates {
            lat: LAT_MIN + lat_normalized * (LAT_MAX - LAT_MIN),
            lng: LNG_MIN + lng_normalized * (LNG_MAX - LNG_MIN),
        }
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedPlace>> {
        Ok(Some(GeocodedPlace {
            coordinates: Self::hash_to_coordinates(address),
            display_name: address.to_string(),
        }))
    }

    async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<String>> {
        Ok(Some(format!("{:.4}, {:.4}", lat, lng)))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ==========================================================================
// RateLimiter
// ==========================================================================

/// Rate limiter enforcing a minimum interval between calls
pub struct RateLimiter {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Mutex::new(None),
            min_interval,
        }
    }

    /// Wait until it's safe to make another call
    pub async fn wait(&self) {
        let mut last = self.last_call.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                drop(last);
                tokio::time::sleep(wait_time).await;
                last = self.last_call.lock().await;
            }
        }

        *last = Some(Instant::now());
    }
}

// ==========================================================================
// NominatimGeocoder
// ==========================================================================

/// Nominatim usage policy: at most one request per second
const NOMINATIM_MIN_INTERVAL: Duration = Duration::from_millis(1100);

/// Rate-limited Nominatim geocoder for production use
pub struct NominatimGeocoder {
    client: NominatimClient,
    limiter: RateLimiter,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: NominatimClient::new(base_url),
            limiter: RateLimiter::new(NOMINATIM_MIN_INTERVAL),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedPlace>> {
        self.limiter.wait().await;
        self.client.geocode(address).await
    }

    async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<String>> {
        self.limiter.wait().await;
        self.client.reverse_geocode(lat, lng).await
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_geocoder_returns_coordinates_for_any_address() {
        let geocoder = MockGeocoder::new();

        let result = geocoder.geocode("742 Evergreen Terrace, Springfield").await;

        assert!(result.is_ok());
        assert!(result.unwrap().is_some());
    }

    #[tokio::test]
    async fn mock_geocoder_is_deterministic() {
        let geocoder = MockGeocoder::new();

        let first = geocoder.geocode("Chicago, IL").await.unwrap().unwrap();
        let second = geocoder.geocode("Chicago, IL").await.unwrap().unwrap();

        assert_eq!(first.coordinates.lat, second.coordinates.lat);
        assert_eq!(first.coordinates.lng, second.coordinates.lng);
    }

    #[tokio::test]
    async fn mock_geocoder_distinguishes_addresses() {
        let geocoder = MockGeocoder::new();

        let chicago = geocoder.geocode("Chicago, IL").await.unwrap().unwrap();
        let dallas = geocoder.geocode("Dallas, TX").await.unwrap().unwrap();

        assert_ne!(chicago.coordinates.lat, dallas.coordinates.lat);
        assert_ne!(chicago.coordinates.lng, dallas.coordinates.lng);
    }

    #[tokio::test]
    async fn mock_geocoder_stays_inside_continental_us() {
        let geocoder = MockGeocoder::new();

        let addresses = [
            "Chicago, IL",
            "Dallas, TX",
            "500 Main St, Columbus, OH",
            "Pier 39, San Francisco, CA",
        ];

        for address in addresses {
            let place = geocoder.geocode(address).await.unwrap().unwrap();
            assert!(
                (33.0..=45.0).contains(&place.coordinates.lat),
                "latitude {} out of bounds for {}",
                place.coordinates.lat,
                address
            );
            assert!(
                (-115.0..=-80.0).contains(&place.coordinates.lng),
                "longitude {} out of bounds for {}",
                place.coordinates.lng,
                address
            );
        }
    }

    #[tokio::test]
    async fn mock_reverse_formats_coordinates() {
        let geocoder = MockGeocoder::new();
        let label = geocoder.reverse(41.8781, -87.6298).await.unwrap();
        assert_eq!(label.unwrap(), "41.8781, -87.6298");
    }

    #[test]
    fn nominatim_geocoder_has_correct_name() {
        let geocoder = NominatimGeocoder::new("https://nominatim.openstreetmap.org");
        assert_eq!(geocoder.name(), "nominatim");
    }

    #[tokio::test]
    async fn rate_limiter_enforces_minimum_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(100));

        let start = Instant::now();

        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));

        limiter.wait().await;
        assert!(
            start.elapsed() >= Duration::from_millis(100),
            "second call should wait, took {:?}",
            start.elapsed()
        );
    }
}
