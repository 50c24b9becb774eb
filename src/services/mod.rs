//! Business logic services

pub mod day_log;
pub mod geo;
pub mod geocoding;
pub mod hos;
pub mod nominatim;
pub mod routing;
pub mod scheduler;
pub mod trip_store;
