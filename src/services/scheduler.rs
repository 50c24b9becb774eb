//! HOS-compliant trip schedule generation.
//!
//! Walks the route leg by leg and interleaves driving segments with the
//! stops regulation forces along the way: fuel every 1000 miles, a
//! 30-minute break after 8 cumulative driving hours, and a 10-hour
//! off-duty reset when the shift limits run out. Driving time is
//! recomputed from distance at a fixed average speed; the route
//! provider's duration estimates are informational only.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::defaults::{
    AVG_SPEED_MPH, BREAK_DURATION_MINUTES, CYCLE_LIMIT_HOURS, DROPOFF_DURATION_MINUTES,
    FUEL_STOP_DURATION_MINUTES, FUEL_STOP_INTERVAL_MILES, OFF_DUTY_RESET_HOURS,
    PICKUP_DURATION_MINUTES,
};
use crate::services::hos::{HosState, EPSILON_HOURS};
use crate::types::{
    Coordinates, DutyStatus, Location, ScheduleEvent, Stop, StopType, TripSchedule, TripTotals,
};

/// Distances below this are treated as already covered.
const EPSILON_MILES: f64 = 1e-6;

/// Upper bound on consecutive compliance actions without mileage
/// progress. A break followed by a shift reset is the longest
/// legitimate run.
const MAX_STALLED_COMPLIANCE_ACTIONS: u32 = 3;

/// Scheduling failure. No partial schedule is ever returned.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid trip input: {0}")]
    InvalidInput(String),

    #[error(
        "cycle limit prevents completion: {cycle_used_hours:.1}h of the {cycle_limit_hours:.0}h \
         cycle used with {miles_remaining:.1} miles still to drive"
    )]
    CycleLimitReached {
        cycle_used_hours: f64,
        cycle_limit_hours: f64,
        miles_remaining: f64,
    },

    #[error("scheduler stalled after {0} compliance actions without progress")]
    Stalled(u32),
}

/// One leg of the planned route
#[derive(Debug, Clone, Copy)]
pub struct PlannedLeg {
    pub distance_miles: f64,
    /// Provider travel time estimate; not used for scheduling
    pub duration_minutes: f64,
}

/// Input for one scheduling run.
///
/// `start_time` is required: defaulting to the wall clock belongs in
/// the calling layer, never here, so identical inputs always produce
/// identical schedules.
#[derive(Debug, Clone)]
pub struct TripPlan {
    /// current→pickup, then pickup→dropoff
    pub legs: [PlannedLeg; 2],
    pub current: Location,
    pub pickup: Location,
    pub dropoff: Location,
    /// Hours already used in the 70hr/8day cycle
    pub cycle_used_hours: f64,
    pub start_time: DateTime<Utc>,
}

/// Generate an HOS-compliant schedule for the given trip.
pub fn create_trip_schedule(plan: &TripPlan) -> Result<TripSchedule, ScheduleError> {
    validate(plan)?;
    Scheduler::new(plan).run()
}

fn validate(plan: &TripPlan) -> Result<(), ScheduleError> {
    for (i, leg) in plan.legs.iter().enumerate() {
        if !leg.distance_miles.is_finite() || leg.distance_miles < 0.0 {
            return Err(ScheduleError::InvalidInput(format!(
                "leg {} has invalid distance {} miles",
                i + 1,
                leg.distance_miles
            )));
        }
        if !leg.duration_minutes.is_finite() || leg.duration_minutes < 0.0 {
            return Err(ScheduleError::InvalidInput(format!(
                "leg {} has invalid duration {} minutes",
                i + 1,
                leg.duration_minutes
            )));
        }
    }

    if !plan.cycle_used_hours.is_finite()
        || !(0.0..=CYCLE_LIMIT_HOURS).contains(&plan.cycle_used_hours)
    {
        return Err(ScheduleError::InvalidInput(format!(
            "cycleUsedHours must be within [0, {}], got {}",
            CYCLE_LIMIT_HOURS, plan.cycle_used_hours
        )));
    }

    Ok(())
}

fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// Accumulator state for one scheduling run
struct Scheduler<'a> {
    plan: &'a TripPlan,
    hos: HosState,
    now: DateTime<Utc>,
    miles: f64,
    next_fuel_mile: f64,
    events: Vec<ScheduleEvent>,
    stops: Vec<Stop>,
    totals: TripTotals,
}

impl<'a> Scheduler<'a> {
    fn new(plan: &'a TripPlan) -> Self {
        Self {
            plan,
            hos: HosState::with_cycle_hours(plan.cycle_used_hours),
            now: plan.start_time,
            miles: 0.0,
            next_fuel_mile: FUEL_STOP_INTERVAL_MILES,
            events: Vec::new(),
            stops: Vec::new(),
            totals: TripTotals::default(),
        }
    }

    fn run(mut self) -> Result<TripSchedule, ScheduleError> {
        self.hos = self.hos.start_shift();

        self.drive_leg(
            self.plan.legs[0].distance_miles,
            self.plan.legs[1].distance_miles,
            "Pickup",
        )?;
        self.add_pickup_stop();

        self.drive_leg(self.plan.legs[1].distance_miles, 0.0, "Dropoff")?;
        self.add_dropoff_stop();

        self.totals.total_miles = self.miles;

        Ok(TripSchedule {
            events: self.events,
            stops: self.stops,
            totals: self.totals,
            start_time: self.plan.start_time,
            end_time: self.now,
        })
    }

    /// Drive one leg to completion, inserting compliance stops as the
    /// HOS budgets and the fuel interval demand. `miles_after_leg` is
    /// the distance still to be driven on later legs; the fuel rule
    /// looks at the whole trip so a leg ending exactly on a 1000-mile
    /// boundary still fuels when more driving follows.
    fn drive_leg(
        &mut self,
        leg_miles: f64,
        miles_after_leg: f64,
        destination: &str,
    ) -> Result<(), ScheduleError> {
        let mut remaining = leg_miles;
        let mut stalled: u32 = 0;

        while remaining > EPSILON_MILES {
            let max_hos_miles = self.hos.max_continuous_driving() * AVG_SPEED_MPH;
            let miles_to_next_fuel = self.next_fuel_mile - self.miles;
            let segment = remaining.min(max_hos_miles).min(miles_to_next_fuel);

            if segment <= EPSILON_MILES {
                // Cannot drive: exactly one compliance action, then retry.
                stalled += 1;
                if stalled > MAX_STALLED_COMPLIANCE_ACTIONS {
                    return Err(ScheduleError::Stalled(stalled));
                }

                if self.hos.needs_break() {
                    self.add_rest_break();
                } else if self.hos.driving_hours_remaining() <= EPSILON_HOURS
                    || self.hos.duty_window_remaining() <= EPSILON_HOURS
                {
                    self.add_off_duty_reset();
                } else {
                    // Only the cycle can still be binding, and a reset
                    // never restores cycle hours: the trip cannot
                    // continue from here.
                    return Err(ScheduleError::CycleLimitReached {
                        cycle_used_hours: self.hos.cycle_hours_used,
                        cycle_limit_hours: CYCLE_LIMIT_HOURS,
                        miles_remaining: remaining + miles_after_leg,
                    });
                }
                continue;
            }
            stalled = 0;

            self.push_driving(segment, destination);
            remaining -= segment;

            let trip_remaining = remaining + miles_after_leg;
            if self.miles + EPSILON_MILES >= self.next_fuel_mile && trip_remaining > EPSILON_MILES
            {
                self.add_fuel_stop();
                self.next_fuel_mile += FUEL_STOP_INTERVAL_MILES;
            } else if self.hos.needs_break() && remaining > EPSILON_MILES {
                self.add_rest_break();
            } else if (self.hos.driving_hours_remaining() <= EPSILON_HOURS
                || self.hos.duty_window_remaining() <= EPSILON_HOURS)
                && remaining > EPSILON_MILES
            {
                self.add_off_duty_reset();
            }
        }

        Ok(())
    }

    fn push_driving(&mut self, miles: f64, destination: &str) {
        let hours = miles / AVG_SPEED_MPH;
        let end_time = self.now + hours_to_duration(hours);

        let event = ScheduleEvent {
            start_time: self.now,
            end_time,
            status: DutyStatus::Driving,
            note: format!("Driving to {}", destination),
            location: format!("Mile {:.0} - {:.0}", self.miles, self.miles + miles),
            miles_start: self.miles,
            miles_end: self.miles + miles,
        };

        let event_hours = event.duration_hours();
        self.totals.driving_hours += event_hours;
        self.totals.on_duty_hours += event_hours;

        self.hos = self.hos.add_driving(hours);
        self.now = end_time;
        self.miles += miles;
        self.events.push(event);
    }

    fn add_pickup_stop(&mut self) {
        let location = self.plan.pickup.clone();
        self.push_stop(
            StopType::Pickup,
            DutyStatus::OnDutyNotDriving,
            PICKUP_DURATION_MINUTES,
            "Pickup - Loading",
            location.display_name(),
            Some(location.coordinates()),
            "Loading cargo",
        );
        self.hos = self
            .hos
            .add_on_duty(PICKUP_DURATION_MINUTES as f64 / 60.0, true);
    }

    fn add_dropoff_stop(&mut self) {
        let location = self.plan.dropoff.clone();
        self.push_stop(
            StopType::Dropoff,
            DutyStatus::OnDutyNotDriving,
            DROPOFF_DURATION_MINUTES,
            "Dropoff - Unloading",
            location.display_name(),
            Some(location.coordinates()),
            "Unloading cargo",
        );
        self.hos = self
            .hos
            .add_on_duty(DROPOFF_DURATION_MINUTES as f64 / 60.0, true);
    }

    fn add_fuel_stop(&mut self) {
        self.push_stop(
            StopType::Fuel,
            DutyStatus::OnDutyNotDriving,
            FUEL_STOP_DURATION_MINUTES,
            "Fuel Stop",
            format!("Fuel stop at mile {:.0}", self.miles),
            None,
            "Refueling",
        );
        self.hos = self
            .hos
            .add_on_duty(FUEL_STOP_DURATION_MINUTES as f64 / 60.0, true);
    }

    fn add_rest_break(&mut self) {
        self.push_stop(
            StopType::RestBreak,
            DutyStatus::OffDuty,
            BREAK_DURATION_MINUTES,
            "30-min Rest Break (8hr rule)",
            format!("Near mile {:.0}", self.miles),
            None,
            "Required 30-minute break after 8 hours driving",
        );
        self.hos = self.hos.add_off_duty(BREAK_DURATION_MINUTES as f64 / 60.0);
    }

    fn add_off_duty_reset(&mut self) {
        self.push_stop(
            StopType::OffDutyReset,
            DutyStatus::OffDuty,
            (OFF_DUTY_RESET_HOURS * 60.0) as i64,
            "10-hr Off Duty (Shift Reset)",
            format!("Near mile {:.0}", self.miles),
            None,
            "Required 10-hour off-duty period to reset driving limits",
        );
        self.hos = self.hos.add_off_duty(OFF_DUTY_RESET_HOURS);
    }

    #[allow(clippy::too_many_arguments)]
    fn push_stop(
        &mut self,
        stop_type: StopType,
        status: DutyStatus,
        duration_minutes: i64,
        note: &str,
        location: String,
        coordinates: Option<Coordinates>,
        reason: &str,
    ) {
        let end_time = self.now + Duration::minutes(duration_minutes);

        let event = ScheduleEvent {
            start_time: self.now,
            end_time,
            status,
            note: note.to_string(),
            location: location.clone(),
            miles_start: self.miles,
            miles_end: self.miles,
        };

        match status {
            DutyStatus::OnDutyNotDriving => self.totals.on_duty_hours += event.duration_hours(),
            DutyStatus::OffDuty => self.totals.off_duty_hours += event.duration_hours(),
            DutyStatus::Driving | DutyStatus::SleeperBerth => {}
        }

        self.events.push(event);
        self.stops.push(Stop {
            stop_type,
            duration_minutes,
            location,
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
            mile_marker: self.miles,
            reason: reason.to_string(),
        });
        self.now = end_time;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
