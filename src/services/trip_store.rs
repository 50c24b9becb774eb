//! In-memory store of planned trips.
//!
//! The frontend fetches a planned trip back by id when rendering log
//! sheets, so each plan is kept for a while. The store is bounded:
//! once capacity is reached the oldest plan is evicted first.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::types::PlanTripResponse;

/// Default number of trips kept in memory
pub const DEFAULT_CAPACITY: usize = 256;

/// Bounded FIFO trip store, safe to share across handler tasks
pub struct TripStore {
    capacity: usize,
    inner: RwLock<Inner>,
}

struct Inner {
    trips: HashMap<Uuid, PlanTripResponse>,
    order: VecDeque<Uuid>,
}

impl TripStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(Inner {
                trips: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Store a planned trip, evicting the oldest when full
    pub fn insert(&self, trip: PlanTripResponse) {
        let mut inner = self.inner.write();

        while inner.order.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.trips.remove(&oldest);
            }
        }

        inner.order.push_back(trip.trip_id);
        inner.trips.insert(trip.trip_id, trip);
    }

    pub fn get(&self, trip_id: &Uuid) -> Option<PlanTripResponse> {
        self.inner.read().trips.get(trip_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().trips.is_empty()
    }
}

impl Default for TripStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::types::{RoutePayload, TripSummary};

    fn stored_trip() -> PlanTripResponse {
        let now = Utc::now();
        PlanTripResponse {
            trip_id: Uuid::new_v4(),
            route: RoutePayload {
                polyline: String::new(),
                total_distance_miles: 100.0,
                total_duration_minutes: 109.1,
                legs: vec![],
                waypoints: vec![],
            },
            stops: vec![],
            schedule: vec![],
            log_days: vec![],
            summary: TripSummary {
                total_driving_hours: 1.8,
                total_on_duty_hours: 3.8,
                total_off_duty_hours: 0.0,
                total_miles: 100.0,
                start_time: now,
                end_time: now,
                total_days: 1,
                cycle_hours_used: 0.0,
                cycle_hours_remaining: 66.2,
            },
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = TripStore::new(8);
        let trip = stored_trip();
        let id = trip.trip_id;

        store.insert(trip);

        let fetched = store.get(&id).expect("trip should be stored");
        assert_eq!(fetched.trip_id, id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let store = TripStore::new(8);
        assert!(store.get(&Uuid::new_v4()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_eviction_drops_oldest_first() {
        let store = TripStore::new(2);

        let first = stored_trip();
        let second = stored_trip();
        let third = stored_trip();
        let (id1, id2, id3) = (first.trip_id, second.trip_id, third.trip_id);

        store.insert(first);
        store.insert(second);
        store.insert(third);

        assert_eq!(store.len(), 2);
        assert!(store.get(&id1).is_none(), "oldest should be evicted");
        assert!(store.get(&id2).is_some());
        assert!(store.get(&id3).is_some());
    }

    #[test]
    fn test_zero_capacity_is_clamped_to_one() {
        let store = TripStore::new(0);
        let trip = stored_trip();
        let id = trip.trip_id;

        store.insert(trip);
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_some());
    }
}
