//! FMCSA HOS constants (property carrier, 70hr/8days) and operational
//! defaults used by the trip scheduler.

/// Maximum driving hours per shift
pub const MAX_DRIVING_HOURS: f64 = 11.0;

/// Maximum on-duty window after coming on duty
pub const MAX_DUTY_WINDOW_HOURS: f64 = 14.0;

/// Driving hours after which a 30-minute break is required
pub const BREAK_REQUIRED_AFTER_HOURS: f64 = 8.0;

/// Required break duration
pub const BREAK_DURATION_MINUTES: i64 = 30;

/// Off-duty hours required to reset the shift
pub const OFF_DUTY_RESET_HOURS: f64 = 10.0;

/// Rolling 8-day cycle limit
pub const CYCLE_LIMIT_HOURS: f64 = 70.0;

/// Fuel stop at least every 1000 miles
pub const FUEL_STOP_INTERVAL_MILES: f64 = 1000.0;

/// Time for a fuel stop
pub const FUEL_STOP_DURATION_MINUTES: i64 = 30;

/// Time for loading at pickup
pub const PICKUP_DURATION_MINUTES: i64 = 60;

/// Time for unloading at dropoff
pub const DROPOFF_DURATION_MINUTES: i64 = 60;

/// Average driving speed used to convert distance to duration
pub const AVG_SPEED_MPH: f64 = 55.0;
