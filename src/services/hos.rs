//! Hours of Service (HOS) rules engine.
//!
//! Implements the FMCSA limits for property-carrying drivers on the
//! 70hr/8day cycle: 11 driving hours and a 14-hour duty window per
//! shift, a 30-minute break after 8 cumulative driving hours, and the
//! 10-hour off-duty shift reset.
//!
//! [`HosState`] is an immutable snapshot; every transition consumes the
//! old state and returns a new one, which keeps a scheduling run
//! replayable and free of aliasing.

use crate::defaults::{
    BREAK_DURATION_MINUTES, BREAK_REQUIRED_AFTER_HOURS, CYCLE_LIMIT_HOURS, MAX_DRIVING_HOURS,
    MAX_DUTY_WINDOW_HOURS, OFF_DUTY_RESET_HOURS,
};

/// Tolerance for limits reached through accumulated segment arithmetic.
pub const EPSILON_HOURS: f64 = 1e-9;

/// Snapshot of a driver's standing against each HOS limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HosState {
    /// Driving hours in the current shift
    pub driving_hours_in_shift: f64,
    /// Total on-duty hours in the current shift (includes driving)
    pub on_duty_hours_in_shift: f64,
    /// Hours elapsed since the shift started (14-hr window)
    pub duty_window_hours: f64,
    /// Driving hours since the last qualifying break
    pub driving_since_last_break: f64,
    /// Total on-duty hours in the 8-day cycle
    pub cycle_hours_used: f64,
    /// Whether the driver is in an active shift
    pub shift_active: bool,
}

impl HosState {
    /// Fresh state at the start of a trip, seeded with hours carried
    /// over from the prior cycle period.
    pub fn with_cycle_hours(cycle_hours_used: f64) -> Self {
        Self {
            driving_hours_in_shift: 0.0,
            on_duty_hours_in_shift: 0.0,
            duty_window_hours: 0.0,
            driving_since_last_break: 0.0,
            cycle_hours_used,
            shift_active: false,
        }
    }

    /// Hours of driving remaining in the current shift
    pub fn driving_hours_remaining(&self) -> f64 {
        (MAX_DRIVING_HOURS - self.driving_hours_in_shift).max(0.0)
    }

    /// Hours remaining in the 14-hour window
    pub fn duty_window_remaining(&self) -> f64 {
        (MAX_DUTY_WINDOW_HOURS - self.duty_window_hours).max(0.0)
    }

    /// Hours remaining in the 70-hour cycle
    pub fn cycle_hours_remaining(&self) -> f64 {
        (CYCLE_LIMIT_HOURS - self.cycle_hours_used).max(0.0)
    }

    /// Driving hours until a 30-minute break is required
    pub fn hours_until_break_required(&self) -> f64 {
        (BREAK_REQUIRED_AFTER_HOURS - self.driving_since_last_break).max(0.0)
    }

    /// Whether a 30-minute break is required before more driving
    pub fn needs_break(&self) -> bool {
        self.driving_since_last_break >= BREAK_REQUIRED_AFTER_HOURS - EPSILON_HOURS
    }

    /// Maximum hours of continuous driving currently legal: the binding
    /// minimum of the four remaining budgets. Zero means the driver may
    /// not drive until a compliance action executes.
    pub fn max_continuous_driving(&self) -> f64 {
        let limit = self
            .driving_hours_remaining()
            .min(self.duty_window_remaining())
            .min(self.cycle_hours_remaining())
            .min(self.hours_until_break_required());
        if limit < EPSILON_HOURS {
            0.0
        } else {
            limit
        }
    }

    /// Start a new shift. Shift-scoped counters reset; cycle hours
    /// carry over.
    pub fn start_shift(self) -> Self {
        Self {
            driving_hours_in_shift: 0.0,
            on_duty_hours_in_shift: 0.0,
            duty_window_hours: 0.0,
            driving_since_last_break: 0.0,
            cycle_hours_used: self.cycle_hours_used,
            shift_active: true,
        }
    }

    /// Record driving time. Starts a shift when none is active.
    pub fn add_driving(self, hours: f64) -> Self {
        debug_assert!(hours >= 0.0);
        let state = if self.shift_active {
            self
        } else {
            self.start_shift()
        };

        Self {
            driving_hours_in_shift: state.driving_hours_in_shift + hours,
            on_duty_hours_in_shift: state.on_duty_hours_in_shift + hours,
            duty_window_hours: state.duty_window_hours + hours,
            driving_since_last_break: state.driving_since_last_break + hours,
            cycle_hours_used: state.cycle_hours_used + hours,
            shift_active: true,
        }
    }

    /// Record on-duty (not driving) time. A period of 30+ minutes
    /// flagged `counts_as_break` clears the break requirement.
    pub fn add_on_duty(self, hours: f64, counts_as_break: bool) -> Self {
        debug_assert!(hours >= 0.0);
        let state = if self.shift_active {
            self
        } else {
            self.start_shift()
        };

        let driving_since_last_break =
            if counts_as_break && hours >= BREAK_DURATION_MINUTES as f64 / 60.0 {
                0.0
            } else {
                state.driving_since_last_break
            };

        Self {
            driving_hours_in_shift: state.driving_hours_in_shift,
            on_duty_hours_in_shift: state.on_duty_hours_in_shift + hours,
            duty_window_hours: state.duty_window_hours + hours,
            driving_since_last_break,
            cycle_hours_used: state.cycle_hours_used + hours,
            shift_active: true,
        }
    }

    /// Record off-duty time. 10+ hours resets the shift entirely; any
    /// shorter period still consumes the duty window and satisfies the
    /// break requirement.
    pub fn add_off_duty(self, hours: f64) -> Self {
        debug_assert!(hours >= 0.0);
        if hours >= OFF_DUTY_RESET_HOURS {
            return Self {
                driving_hours_in_shift: 0.0,
                on_duty_hours_in_shift: 0.0,
                duty_window_hours: 0.0,
                driving_since_last_break: 0.0,
                cycle_hours_used: self.cycle_hours_used,
                shift_active: false,
            };
        }

        Self {
            driving_hours_in_shift: self.driving_hours_in_shift,
            on_duty_hours_in_shift: self.on_duty_hours_in_shift,
            duty_window_hours: self.duty_window_hours + hours,
            driving_since_last_break: 0.0,
            cycle_hours_used: self.cycle_hours_used,
            shift_active: self.shift_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_has_full_budgets() {
        let state = HosState::with_cycle_hours(0.0);

        assert_eq!(state.driving_hours_remaining(), 11.0);
        assert_eq!(state.duty_window_remaining(), 14.0);
        assert_eq!(state.cycle_hours_remaining(), 70.0);
        assert_eq!(state.hours_until_break_required(), 8.0);
        assert!(!state.needs_break());
        assert!(!state.shift_active);
    }

    #[test]
    fn test_add_driving_increments_all_counters() {
        let state = HosState::with_cycle_hours(5.0).start_shift().add_driving(3.0);

        assert_eq!(state.driving_hours_in_shift, 3.0);
        assert_eq!(state.on_duty_hours_in_shift, 3.0);
        assert_eq!(state.duty_window_hours, 3.0);
        assert_eq!(state.driving_since_last_break, 3.0);
        assert_eq!(state.cycle_hours_used, 8.0);
    }

    #[test]
    fn test_add_driving_starts_shift_when_inactive() {
        let state = HosState::with_cycle_hours(0.0).add_driving(2.0);

        assert!(state.shift_active);
        assert_eq!(state.driving_hours_in_shift, 2.0);
    }

    #[test]
    fn test_on_duty_does_not_consume_driving_budget() {
        let state = HosState::with_cycle_hours(0.0)
            .start_shift()
            .add_on_duty(1.0, false);

        assert_eq!(state.driving_hours_in_shift, 0.0);
        assert_eq!(state.on_duty_hours_in_shift, 1.0);
        assert_eq!(state.duty_window_hours, 1.0);
        assert_eq!(state.cycle_hours_used, 1.0);
    }

    #[test]
    fn test_on_duty_break_clears_break_counter() {
        let driven = HosState::with_cycle_hours(0.0).start_shift().add_driving(6.0);

        // 30 minutes on duty flagged as break clears the counter
        let after_break = driven.add_on_duty(0.5, true);
        assert_eq!(after_break.driving_since_last_break, 0.0);

        // Same duration without the flag does not
        let no_flag = driven.add_on_duty(0.5, false);
        assert_eq!(no_flag.driving_since_last_break, 6.0);

        // Too short a period does not qualify even when flagged
        let too_short = driven.add_on_duty(0.25, true);
        assert_eq!(too_short.driving_since_last_break, 6.0);
    }

    #[test]
    fn test_short_off_duty_clears_break_but_keeps_shift() {
        let state = HosState::with_cycle_hours(0.0)
            .start_shift()
            .add_driving(8.0)
            .add_off_duty(0.5);

        assert_eq!(state.driving_since_last_break, 0.0);
        assert_eq!(state.driving_hours_in_shift, 8.0);
        assert_eq!(state.duty_window_hours, 8.5);
        assert!(state.shift_active);
    }

    #[test]
    fn test_ten_hour_off_duty_resets_shift_but_not_cycle() {
        let state = HosState::with_cycle_hours(0.0)
            .start_shift()
            .add_driving(11.0)
            .add_off_duty(10.0);

        assert_eq!(state.driving_hours_in_shift, 0.0);
        assert_eq!(state.duty_window_hours, 0.0);
        assert_eq!(state.driving_since_last_break, 0.0);
        assert_eq!(state.cycle_hours_used, 11.0);
        assert!(!state.shift_active);
    }

    #[test]
    fn test_needs_break_at_eight_hours() {
        let state = HosState::with_cycle_hours(0.0).start_shift().add_driving(8.0);
        assert!(state.needs_break());
        assert_eq!(state.max_continuous_driving(), 0.0);
    }

    #[test]
    fn test_needs_break_tolerates_float_drift() {
        // Segment arithmetic can land a hair under the threshold
        let state = HosState::with_cycle_hours(0.0)
            .start_shift()
            .add_driving(8.0 - 1e-12);
        assert!(state.needs_break());
    }

    #[test]
    fn test_max_continuous_driving_binds_on_driving_limit() {
        let state = HosState::with_cycle_hours(0.0)
            .start_shift()
            .add_driving(7.0)
            .add_on_duty(0.5, true);

        // 4h driving left vs 6.5h window vs 8h until break vs 62.5h cycle
        assert!((state.max_continuous_driving() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_continuous_driving_binds_on_window() {
        let state = HosState::with_cycle_hours(0.0)
            .start_shift()
            .add_on_duty(13.0, true);

        assert!((state.max_continuous_driving() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_continuous_driving_binds_on_cycle() {
        let state = HosState::with_cycle_hours(69.5).start_shift();
        assert!((state.max_continuous_driving() - 0.5).abs() < 1e-9);

        let exhausted = state.add_driving(0.5);
        assert_eq!(exhausted.max_continuous_driving(), 0.0);
        assert_eq!(exhausted.cycle_hours_remaining(), 0.0);
    }

    #[test]
    fn test_transitions_do_not_mutate_input() {
        let before = HosState::with_cycle_hours(10.0).start_shift();
        let _after = before.add_driving(4.0);

        assert_eq!(before.driving_hours_in_shift, 0.0);
        assert_eq!(before.cycle_hours_used, 10.0);
    }
}
