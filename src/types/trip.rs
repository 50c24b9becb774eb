//! Trip planning message payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DailyTotals, ScheduleEvent, Stop};

/// A waypoint as supplied by the caller: either coordinates or a
/// free-form address (coordinates win when both are present).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
}

impl LocationInput {
    pub fn from_coordinates(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            address: None,
        }
    }

    pub fn from_address(address: impl Into<String>) -> Self {
        Self {
            lat: None,
            lng: None,
            address: Some(address.into()),
        }
    }

    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }

    /// True when neither coordinates nor a usable address are present
    pub fn is_empty(&self) -> bool {
        !self.has_coordinates()
            && self
                .address
                .as_deref()
                .map(|a| a.trim().is_empty())
                .unwrap_or(true)
    }
}

/// roadlog.trip.plan request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTripRequest {
    pub current: LocationInput,
    pub pickup: LocationInput,
    pub dropoff: LocationInput,
    /// Hours already used in the 70hr/8day cycle
    #[serde(default)]
    pub cycle_used_hours: f64,
    /// Trip start; the worker defaults to the next full hour when unset
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

/// Which trip waypoint a route point corresponds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    Current,
    Pickup,
    Dropoff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointPayload {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub kind: WaypointKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegPayload {
    pub from_location: String,
    pub to_location: String,
    pub distance_miles: f64,
    pub duration_minutes: f64,
}

/// Route section of the plan response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePayload {
    /// Encoded polyline for map display (empty when routing is mocked)
    pub polyline: String,
    pub total_distance_miles: f64,
    pub total_duration_minutes: f64,
    pub legs: Vec<LegPayload>,
    pub waypoints: Vec<WaypointPayload>,
}

/// One calendar day of the planned schedule, ready for log rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLog {
    pub date: NaiveDate,
    pub day_number: u32,
    pub totals: DailyTotals,
    pub events: Vec<ScheduleEvent>,
}

/// Whole-trip summary figures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub total_driving_hours: f64,
    pub total_on_duty_hours: f64,
    pub total_off_duty_hours: f64,
    pub total_miles: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_days: u32,
    pub cycle_hours_used: f64,
    pub cycle_hours_remaining: f64,
}

/// roadlog.trip.plan response payload; also the stored form of a trip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTripResponse {
    pub trip_id: Uuid,
    pub route: RoutePayload,
    pub stops: Vec<Stop>,
    pub schedule: Vec<ScheduleEvent>,
    pub log_days: Vec<DayLog>,
    pub summary: TripSummary,
}

/// roadlog.trip.get request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTripRequest {
    pub trip_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_input_empty_detection() {
        assert!(LocationInput::default().is_empty());
        assert!(LocationInput::from_address("   ").is_empty());
        assert!(!LocationInput::from_address("Dallas, TX").is_empty());
        assert!(!LocationInput::from_coordinates(32.7767, -96.7970).is_empty());
    }

    #[test]
    fn test_plan_request_defaults() {
        let json = r#"{
            "current": { "address": "Chicago, IL" },
            "pickup": { "lat": 39.7684, "lng": -86.1581 },
            "dropoff": { "address": "Louisville, KY" }
        }"#;
        let request: PlanTripRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.cycle_used_hours, 0.0);
        assert!(request.start_time.is_none());
        assert!(request.pickup.has_coordinates());
        assert!(!request.current.has_coordinates());
    }

    #[test]
    fn test_waypoint_kind_wire_format() {
        let payload = WaypointPayload {
            name: "Chicago, IL".to_string(),
            lat: 41.8781,
            lng: -87.6298,
            kind: WaypointKind::Current,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "current");
    }
}
