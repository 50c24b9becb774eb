//! Trip schedule types: duty-status events, stops, and totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ELD duty statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyStatus {
    OffDuty,
    SleeperBerth,
    Driving,
    OnDutyNotDriving,
}

impl DutyStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            DutyStatus::OffDuty => "OFF_DUTY",
            DutyStatus::SleeperBerth => "SLEEPER_BERTH",
            DutyStatus::Driving => "DRIVING",
            DutyStatus::OnDutyNotDriving => "ON_DUTY_NOT_DRIVING",
        }
    }
}

/// Types of stops along a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopType {
    Pickup,
    Dropoff,
    Fuel,
    RestBreak,
    OffDutyReset,
}

impl StopType {
    pub const fn as_str(self) -> &'static str {
        match self {
            StopType::Pickup => "PICKUP",
            StopType::Dropoff => "DROPOFF",
            StopType::Fuel => "FUEL",
            StopType::RestBreak => "REST_BREAK",
            StopType::OffDutyReset => "OFF_DUTY_RESET",
        }
    }
}

/// A single duty-status segment in the trip schedule.
///
/// Events are produced in non-decreasing start order with no overlap;
/// zero-length events are never emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: DutyStatus,
    pub note: String,
    pub location: String,
    pub miles_start: f64,
    pub miles_end: f64,
}

impl ScheduleEvent {
    pub fn duration_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 3_600_000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 60_000.0
    }
}

/// A stop along the route. Every stop corresponds to exactly one
/// non-driving event of matching duration and mile marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub stop_type: StopType,
    pub duration_minutes: i64,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub mile_marker: f64,
    pub reason: String,
}

/// Running totals for a complete schedule. On-duty hours include
/// driving time, matching the ELD summary convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripTotals {
    pub driving_hours: f64,
    pub on_duty_hours: f64,
    pub off_duty_hours: f64,
    pub total_miles: f64,
}

/// Per-day totals over a single calendar day's events. Unlike
/// [`TripTotals`], each status is counted separately here because the
/// daily log grid draws one line per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub driving_hours: f64,
    pub on_duty_hours: f64,
    pub off_duty_hours: f64,
    pub sleeper_hours: f64,
    pub total_miles: f64,
}

/// Complete trip schedule with all events and stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSchedule {
    pub events: Vec<ScheduleEvent>,
    pub stops: Vec<Stop>,
    pub totals: TripTotals,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_duty_status_wire_format() {
        let json = serde_json::to_string(&DutyStatus::OnDutyNotDriving).unwrap();
        assert_eq!(json, "\"ON_DUTY_NOT_DRIVING\"");

        let parsed: DutyStatus = serde_json::from_str("\"SLEEPER_BERTH\"").unwrap();
        assert_eq!(parsed, DutyStatus::SleeperBerth);
    }

    #[test]
    fn test_stop_type_wire_format() {
        let json = serde_json::to_string(&StopType::OffDutyReset).unwrap();
        assert_eq!(json, "\"OFF_DUTY_RESET\"");
        assert_eq!(StopType::RestBreak.as_str(), "REST_BREAK");
    }

    #[test]
    fn test_event_duration_helpers() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let event = ScheduleEvent {
            start_time: start,
            end_time: start + chrono::Duration::minutes(90),
            status: DutyStatus::Driving,
            note: String::new(),
            location: String::new(),
            miles_start: 0.0,
            miles_end: 82.5,
        };

        assert!((event.duration_hours() - 1.5).abs() < 1e-9);
        assert!((event.duration_minutes() - 90.0).abs() < 1e-9);
    }
}
