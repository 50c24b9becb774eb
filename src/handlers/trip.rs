//! Trip planning handlers
//!
//! roadlog.trip.plan resolves the three waypoints, obtains the route,
//! and generates the HOS-compliant schedule with per-day log data.
//! roadlog.trip.get returns a previously planned trip by id.

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use chrono::{DateTime, Duration, DurationRound, Utc};
use futures::StreamExt;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::defaults::CYCLE_LIMIT_HOURS;
use crate::services::day_log;
use crate::services::geocoding::Geocoder;
use crate::services::routing::RouteProvider;
use crate::services::scheduler::{create_trip_schedule, PlannedLeg, ScheduleError, TripPlan};
use crate::services::trip_store::TripStore;
use crate::types::{
    DayLog, ErrorResponse, GetTripRequest, LegPayload, Location, LocationInput, PlanTripRequest,
    PlanTripResponse, Request, RoutePayload, SuccessResponse, TripSummary, WaypointKind,
    WaypointPayload,
};

/// Failure taxonomy for a planning request, mapped to wire error codes
#[derive(Debug, Error)]
pub enum PlanTripError {
    #[error("{0}")]
    InvalidLocation(String),

    #[error("unable to calculate route: {0}")]
    RouteUnavailable(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

impl PlanTripError {
    pub fn code(&self) -> &'static str {
        match self {
            PlanTripError::InvalidLocation(_) => "INVALID_LOCATION",
            PlanTripError::RouteUnavailable(_) => "ROUTE_UNAVAILABLE",
            PlanTripError::Schedule(ScheduleError::InvalidInput(_)) => "INVALID_REQUEST",
            PlanTripError::Schedule(ScheduleError::CycleLimitReached { .. }) => {
                "CYCLE_LIMIT_EXCEEDED"
            }
            PlanTripError::Schedule(ScheduleError::Stalled(_)) => "SCHEDULE_ERROR",
        }
    }
}

/// Round a wall-clock instant forward to the next full hour. The
/// scheduler itself requires an explicit start time; this default
/// belongs to the calling layer.
pub fn next_full_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = now.duration_trunc(Duration::hours(1)).unwrap_or(now);
    truncated + Duration::hours(1)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Resolve a waypoint input to coordinates plus a display address.
/// Bare coordinates are labeled via reverse geocoding when possible.
pub async fn resolve_location(
    geocoder: &dyn Geocoder,
    input: &LocationInput,
    name: &str,
) -> Result<Location, PlanTripError> {
    if let (Some(lat), Some(lng)) = (input.lat, input.lng) {
        let address = match input.address.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(address) => address.to_string(),
            None => match geocoder.reverse(lat, lng).await {
                Ok(Some(label)) => label,
                _ => format!("{:.4}, {:.4}", lat, lng),
            },
        };
        return Ok(Location::new(lat, lng, address));
    }

    if let Some(address) = input.address.as_deref().filter(|a| !a.trim().is_empty()) {
        return match geocoder.geocode(address).await {
            Ok(Some(place)) => Ok(Location::new(
                place.coordinates.lat,
                place.coordinates.lng,
                place.display_name,
            )),
            Ok(None) => Err(PlanTripError::InvalidLocation(format!(
                "unable to geocode {} location {:?}",
                name, address
            ))),
            Err(e) => Err(PlanTripError::InvalidLocation(format!(
                "geocoding {} location failed: {}",
                name, e
            ))),
        };
    }

    Err(PlanTripError::InvalidLocation(format!(
        "either coordinates or an address are required for the {} location",
        name
    )))
}

/// Plan one trip end to end. Shared between the NATS handler and the
/// one-shot CLI path.
pub async fn plan_trip(
    request: &PlanTripRequest,
    geocoder: &dyn Geocoder,
    routes: &dyn RouteProvider,
) -> Result<PlanTripResponse, PlanTripError> {
    let current = resolve_location(geocoder, &request.current, "current").await?;
    let pickup = resolve_location(geocoder, &request.pickup, "pickup").await?;
    let dropoff = resolve_location(geocoder, &request.dropoff, "dropoff").await?;

    let route = routes
        .plan_route(
            current.coordinates(),
            pickup.coordinates(),
            dropoff.coordinates(),
        )
        .await
        .map_err(|e| PlanTripError::RouteUnavailable(e.to_string()))?;

    if route.legs.len() != 2 {
        return Err(PlanTripError::RouteUnavailable(format!(
            "expected 2 route legs, got {}",
            route.legs.len()
        )));
    }

    let start_time = request
        .start_time
        .unwrap_or_else(|| next_full_hour(Utc::now()));

    let plan = TripPlan {
        legs: [
            PlannedLeg {
                distance_miles: route.legs[0].distance_miles,
                duration_minutes: route.legs[0].duration_minutes,
            },
            PlannedLeg {
                distance_miles: route.legs[1].distance_miles,
                duration_minutes: route.legs[1].duration_minutes,
            },
        ],
        current: current.clone(),
        pickup: pickup.clone(),
        dropoff: dropoff.clone(),
        cycle_used_hours: request.cycle_used_hours,
        start_time,
    };

    let schedule = create_trip_schedule(&plan)?;

    let by_day = day_log::schedule_by_day(&schedule);
    let log_days: Vec<DayLog> = by_day
        .iter()
        .enumerate()
        .map(|(i, (date, events))| DayLog {
            date: *date,
            day_number: i as u32 + 1,
            totals: day_log::daily_totals(events),
            events: events.clone(),
        })
        .collect();

    let summary = TripSummary {
        total_driving_hours: round2(schedule.totals.driving_hours),
        total_on_duty_hours: round2(schedule.totals.on_duty_hours),
        total_off_duty_hours: round2(schedule.totals.off_duty_hours),
        total_miles: round1(schedule.totals.total_miles),
        start_time: schedule.start_time,
        end_time: schedule.end_time,
        total_days: log_days.len() as u32,
        cycle_hours_used: request.cycle_used_hours,
        cycle_hours_remaining: round2(
            CYCLE_LIMIT_HOURS - request.cycle_used_hours - schedule.totals.on_duty_hours,
        ),
    };

    let waypoints = vec![
        WaypointPayload {
            name: current.display_name(),
            lat: current.lat,
            lng: current.lng,
            kind: WaypointKind::Current,
        },
        WaypointPayload {
            name: pickup.display_name(),
            lat: pickup.lat,
            lng: pickup.lng,
            kind: WaypointKind::Pickup,
        },
        WaypointPayload {
            name: dropoff.display_name(),
            lat: dropoff.lat,
            lng: dropoff.lng,
            kind: WaypointKind::Dropoff,
        },
    ];

    Ok(PlanTripResponse {
        trip_id: Uuid::new_v4(),
        route: RoutePayload {
            polyline: route.polyline.clone(),
            total_distance_miles: round1(route.total_distance_miles),
            total_duration_minutes: round1(route.total_duration_minutes),
            legs: route
                .legs
                .iter()
                .map(|leg| LegPayload {
                    from_location: leg.from_location.clone(),
                    to_location: leg.to_location.clone(),
                    distance_miles: round1(leg.distance_miles),
                    duration_minutes: round1(leg.duration_minutes),
                })
                .collect(),
            waypoints,
        },
        stops: schedule.stops,
        schedule: schedule.events,
        log_days,
        summary,
    })
}

/// Handle roadlog.trip.plan requests
pub async fn handle_plan(
    client: Client,
    mut subscriber: Subscriber,
    geocoder: Arc<dyn Geocoder>,
    routes: Arc<dyn RouteProvider>,
    store: Arc<TripStore>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<PlanTripRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse trip plan request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match plan_trip(&request.payload, geocoder.as_ref(), routes.as_ref()).await {
            Ok(response) => {
                info!(
                    "Planned trip {}: {:.1} miles over {} days",
                    response.trip_id, response.summary.total_miles, response.summary.total_days
                );
                store.insert(response.clone());
                let success = SuccessResponse::new(request.id, response);
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            Err(e) => {
                error!("Trip planning failed: {}", e);
                let error = ErrorResponse::new(request.id, e.code(), e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle roadlog.trip.get requests
pub async fn handle_get(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<TripStore>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<GetTripRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse trip get request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match store.get(&request.payload.trip_id) {
            Some(trip) => {
                let success = SuccessResponse::new(request.id, trip);
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            None => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "Trip not found");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
