//! Configuration management

use anyhow::{self, Result};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Nominatim API URL (for geocoding)
    pub nominatim_url: String,

    /// OSRM routing engine URL (optional, falls back to mock routing)
    pub osrm_url: Option<String>,

    /// Geocoder backend: "nominatim" or "mock"
    pub geocoder_backend: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url =
            std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let nominatim_url = std::env::var("NOMINATIM_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        let osrm_url = std::env::var("OSRM_URL").ok();

        let geocoder_backend =
            std::env::var("GEOCODER_BACKEND").unwrap_or_else(|_| "nominatim".to_string());

        if !matches!(geocoder_backend.as_str(), "nominatim" | "mock") {
            anyhow::bail!(
                "GEOCODER_BACKEND must be \"nominatim\" or \"mock\", got {:?}",
                geocoder_backend
            );
        }

        Ok(Self {
            nats_url,
            nominatim_url,
            osrm_url,
            geocoder_backend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_osrm_url_none_when_not_set() {
        std::env::remove_var("OSRM_URL");

        let config = Config::from_env().unwrap();
        assert!(config.osrm_url.is_none());
    }

    #[test]
    fn test_config_osrm_url_some_when_set() {
        std::env::set_var("OSRM_URL", "http://localhost:5000");

        let config = Config::from_env().unwrap();
        assert_eq!(config.osrm_url, Some("http://localhost:5000".to_string()));

        // Cleanup
        std::env::remove_var("OSRM_URL");
    }

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_nominatim_url_defaults_to_public() {
        std::env::remove_var("NOMINATIM_URL");

        let config = Config::from_env().unwrap();
        assert_eq!(config.nominatim_url, "https://nominatim.openstreetmap.org");
    }

    #[test]
    fn test_config_rejects_unknown_geocoder_backend() {
        std::env::set_var("GEOCODER_BACKEND", "carrier-pigeon");

        let result = Config::from_env();
        assert!(result.is_err());

        // Cleanup
        std::env::remove_var("GEOCODER_BACKEND");
    }

    #[test]
    fn test_config_accepts_mock_backend() {
        std::env::set_var("GEOCODER_BACKEND", "mock");

        let config = Config::from_env().unwrap();
        assert_eq!(config.geocoder_backend, "mock");

        // Cleanup
        std::env::remove_var("GEOCODER_BACKEND");
    }
}
