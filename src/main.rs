//! RoadLog Worker - backend service for ELD trip planning
//!
//! Connects to NATS and serves trip planning, geocoding, and trip
//! retrieval requests. The `plan` subcommand runs a single planning
//! pass without the message bus and prints the result.

mod cli;
mod config;
mod defaults;
mod handlers;
mod services;
mod types;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Logs directory - use LOGS_DIR env var or default to ../logs (relative to worker)
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "../logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "worker.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,roadlog_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer()) // stdout
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        ) // file
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    if let Some(cli::Command::Plan {
        current,
        pickup,
        dropoff,
        cycle_used_hours,
        start_time,
    }) = args.command
    {
        return plan_once(
            &config,
            &current,
            &pickup,
            &dropoff,
            cycle_used_hours,
            start_time,
        )
        .await;
    }

    info!("Starting RoadLog Worker...");
    info!("Configuration loaded");

    // Connect to NATS (supports optional NATS_USER/NATS_PASSWORD auth).
    let nats_client = match (std::env::var("NATS_USER"), std::env::var("NATS_PASSWORD")) {
        (Ok(user), Ok(password)) if !user.is_empty() => {
            async_nats::ConnectOptions::new()
                .user_and_password(user, password)
                .connect(&config.nats_url)
                .await?
        }
        _ => async_nats::connect(&config.nats_url).await?,
    };
    info!("Connected to NATS at {}", config.nats_url);

    // Start message handlers
    let handler_result = handlers::start_handlers(nats_client, &config).await;

    if let Err(e) = handler_result {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Plan a single trip from the command line and print the response JSON.
async fn plan_once(
    config: &config::Config,
    current: &str,
    pickup: &str,
    dropoff: &str,
    cycle_used_hours: f64,
    start_time: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<()> {
    use crate::services::geocoding::create_geocoder;
    use crate::services::routing::create_route_provider;
    use crate::types::PlanTripRequest;

    let geocoder = create_geocoder(config);
    let routes = create_route_provider(config.osrm_url.clone());

    let request = PlanTripRequest {
        current: cli::parse_location_arg(current),
        pickup: cli::parse_location_arg(pickup),
        dropoff: cli::parse_location_arg(dropoff),
        cycle_used_hours,
        start_time,
    };

    match handlers::trip::plan_trip(&request, geocoder.as_ref(), routes.as_ref()).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            error!("Trip planning failed ({}): {}", e.code(), e);
            Err(e.into())
        }
    }
}
