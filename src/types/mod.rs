//! Type definitions

pub mod geocode;
pub mod location;
pub mod messages;
pub mod schedule;
pub mod trip;

pub use geocode::*;
pub use location::*;
pub use messages::*;
pub use schedule::*;
pub use trip::*;
