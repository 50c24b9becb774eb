//! Geocoding handlers
//!
//! roadlog.geocode resolves a free-form address to coordinates;
//! roadlog.geocode.reverse labels coordinates with a short address.

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::error;
use uuid::Uuid;

use crate::services::geocoding::Geocoder;
use crate::types::{
    ErrorResponse, GeocodeRequest, GeocodeResponse, Request, ReverseGeocodeRequest,
    ReverseGeocodeResponse, SuccessResponse,
};

/// Handle roadlog.geocode requests
pub async fn handle_geocode(
    client: Client,
    mut subscriber: Subscriber,
    geocoder: Arc<dyn Geocoder>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<GeocodeRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse geocode request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match geocoder.geocode(&request.payload.address).await {
            Ok(Some(place)) => {
                let response = GeocodeResponse {
                    lat: place.coordinates.lat,
                    lng: place.coordinates.lng,
                    address: place.display_name,
                };
                let success = SuccessResponse::new(request.id, response);
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            Ok(None) => {
                let error =
                    ErrorResponse::new(request.id, "GEOCODE_FAILED", "Unable to geocode address");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
            Err(e) => {
                error!("Geocoding failed: {}", e);
                let error = ErrorResponse::new(request.id, "GEOCODE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle roadlog.geocode.reverse requests. Reverse geocoding is best
/// effort: when the provider has no answer the bare coordinates are
/// returned as the label.
pub async fn handle_reverse(
    client: Client,
    mut subscriber: Subscriber,
    geocoder: Arc<dyn Geocoder>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<ReverseGeocodeRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse reverse geocode request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let ReverseGeocodeRequest { lat, lng } = request.payload;
        let address = match geocoder.reverse(lat, lng).await {
            Ok(Some(label)) => label,
            Ok(None) => format!("{:.4}, {:.4}", lat, lng),
            Err(e) => {
                error!("Reverse geocoding failed: {}", e);
                format!("{:.4}, {:.4}", lat, lng)
            }
        };

        let success =
            SuccessResponse::new(request.id, ReverseGeocodeResponse { lat, lng, address });
        let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
    }

    Ok(())
}
