//! Daily log views over a trip schedule.
//!
//! A duty segment may span midnight, but the ELD log renderer draws one
//! 24-hour grid per calendar day. Events are therefore split at day
//! boundaries, with miles pro-rated linearly over the split, and grouped
//! under ordered date keys. This is purely a view: the original event
//! sequence is never altered.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{DailyTotals, DutyStatus, ScheduleEvent, TripSchedule};

/// Group schedule events by calendar day (UTC), splitting events that
/// cross midnight into per-day sub-events.
pub fn schedule_by_day(schedule: &TripSchedule) -> BTreeMap<NaiveDate, Vec<ScheduleEvent>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<ScheduleEvent>> = BTreeMap::new();

    for event in &schedule.events {
        let mut start = event.start_time;
        while start < event.end_time {
            let day = start.date_naive();
            let next_midnight = day
                .succ_opt()
                .expect("date within chrono range")
                .and_hms_opt(0, 0, 0)
                .expect("valid midnight")
                .and_utc();
            let end = next_midnight.min(event.end_time);

            by_day
                .entry(day)
                .or_default()
                .push(slice_event(event, start, end));
            start = end;
        }
    }

    by_day
}

/// Cut `[start, end)` out of `event`, interpolating miles by elapsed time.
fn slice_event(event: &ScheduleEvent, start: DateTime<Utc>, end: DateTime<Utc>) -> ScheduleEvent {
    let total_ms = (event.end_time - event.start_time).num_milliseconds() as f64;
    let miles = event.miles_end - event.miles_start;

    let mile_at = |t: DateTime<Utc>| {
        if total_ms <= 0.0 {
            event.miles_start
        } else {
            let fraction = (t - event.start_time).num_milliseconds() as f64 / total_ms;
            event.miles_start + miles * fraction
        }
    };

    ScheduleEvent {
        start_time: start,
        end_time: end,
        status: event.status,
        note: event.note.clone(),
        location: event.location.clone(),
        miles_start: mile_at(start),
        miles_end: mile_at(end),
    }
}

/// Sum a single day's events into per-status hours and driven miles.
/// Mileage is attributed only to driving events.
pub fn daily_totals(events: &[ScheduleEvent]) -> DailyTotals {
    let mut totals = DailyTotals::default();

    for event in events {
        let hours = event.duration_hours();
        match event.status {
            DutyStatus::Driving => {
                totals.driving_hours += hours;
                totals.total_miles += event.miles_end - event.miles_start;
            }
            DutyStatus::OnDutyNotDriving => totals.on_duty_hours += hours,
            DutyStatus::OffDuty => totals.off_duty_hours += hours,
            DutyStatus::SleeperBerth => totals.sleeper_hours += hours,
        }
    }

    totals
}
