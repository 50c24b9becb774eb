//! Geocoding message payloads

use serde::{Deserialize, Serialize};

/// roadlog.geocode request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeRequest {
    pub address: String,
}

/// roadlog.geocode response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResponse {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// roadlog.geocode.reverse request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodeRequest {
    pub lat: f64,
    pub lng: f64,
}

/// roadlog.geocode.reverse response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodeResponse {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}
