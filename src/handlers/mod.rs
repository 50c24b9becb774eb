//! NATS message handlers

pub mod geocode;
pub mod ping;
pub mod trip;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use tokio::select;
use tracing::{error, info};

use crate::config::Config;
use crate::services::geocoding::{create_geocoder, Geocoder};
use crate::services::routing::{create_route_provider, RouteProvider};
use crate::services::trip_store::TripStore;

/// Start all message handlers
pub async fn start_handlers(client: Client, config: &Config) -> Result<()> {
    info!("Starting message handlers...");

    // Shared collaborators
    let geocoder: Arc<dyn Geocoder> = Arc::from(create_geocoder(config));
    info!("Geocoder initialized: {}", geocoder.name());

    let routes: Arc<dyn RouteProvider> = Arc::from(create_route_provider(config.osrm_url.clone()));
    info!("Route provider initialized: {}", routes.name());

    let store = Arc::new(TripStore::default());

    // Subscribe to all subjects
    let ping_sub = client.subscribe("roadlog.ping").await?;
    let trip_plan_sub = client.subscribe("roadlog.trip.plan").await?;
    let trip_get_sub = client.subscribe("roadlog.trip.get").await?;
    let geocode_sub = client.subscribe("roadlog.geocode").await?;
    let reverse_sub = client.subscribe("roadlog.geocode.reverse").await?;

    info!("Subscribed to all subjects, worker ready");

    // Clones for each handler task
    let client_ping = client.clone();
    let client_trip_plan = client.clone();
    let client_trip_get = client.clone();
    let client_geocode = client.clone();
    let client_reverse = client.clone();

    let geocoder_plan = Arc::clone(&geocoder);
    let geocoder_geocode = Arc::clone(&geocoder);
    let geocoder_reverse = Arc::clone(&geocoder);

    let store_plan = Arc::clone(&store);
    let store_get = Arc::clone(&store);

    // Spawn handlers
    let ping_handle = tokio::spawn(async move { ping::handle_ping(client_ping, ping_sub).await });

    let trip_plan_handle = tokio::spawn(async move {
        trip::handle_plan(client_trip_plan, trip_plan_sub, geocoder_plan, routes, store_plan).await
    });

    let trip_get_handle =
        tokio::spawn(async move { trip::handle_get(client_trip_get, trip_get_sub, store_get).await });

    let geocode_handle = tokio::spawn(async move {
        geocode::handle_geocode(client_geocode, geocode_sub, geocoder_geocode).await
    });

    let reverse_handle = tokio::spawn(async move {
        geocode::handle_reverse(client_reverse, reverse_sub, geocoder_reverse).await
    });

    // Handlers run until the NATS connection drops; the first to finish
    // tears the worker down.
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = trip_plan_handle => {
            error!("Trip plan handler finished: {:?}", result);
        }
        result = trip_get_handle => {
            error!("Trip get handler finished: {:?}", result);
        }
        result = geocode_handle => {
            error!("Geocode handler finished: {:?}", result);
        }
        result = reverse_handle => {
            error!("Reverse geocode handler finished: {:?}", result);
        }
    }

    Ok(())
}
