use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::shared::time::{Duration, Time};

/// Dense, build-time-assigned indices. Plain `u32` rather than newtypes,
/// matching the rest of the engine's array-indexing style.
pub type StationIdx = u32;
pub type StopIdx = u32;
pub type TripIdx = u32;
pub type RouteIdx = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub index: StationIdx,
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub stops: Vec<StopIdx>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub index: StopIdx,
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub platform_code: Option<Arc<str>>,
    pub station: StationIdx,
}

/// One stop visited by a trip. `position` is the stop's 0-based offset
/// within the owning trip's stop sequence, doubling as the index into
/// `Trip::stop_times`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TripStopTime {
    pub position: u16,
    pub stop: StopIdx,
    pub arrival: Time,
    pub departure: Time,
    /// Fare charged when boarding at this stop, in the smallest currency
    /// unit. Non-negative; zero if the feed carries no fare data.
    pub boarding_fare: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub index: TripIdx,
    pub id: Arc<str>,
    pub route: RouteIdx,
    pub short_name: Option<Arc<str>>,
    pub headsign: Option<Arc<str>>,
    /// Ordered by `position`; owns the arena slot the rest of the engine
    /// treats as this trip's `TripStopTime` sequence.
    pub stop_times: Vec<TripStopTime>,
}

/// The equivalence class of trips sharing an identical ordered stop
/// sequence. Trips are sorted by departure at position 0, which — once the
/// FIFO invariant is asserted at build time — is equivalent to sorted by
/// departure at every position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub index: RouteIdx,
    pub stops: Arc<[StopIdx]>,
    pub trips: Vec<TripIdx>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transfer {
    pub from_stop: StopIdx,
    pub to_stop: StopIdx,
    pub layover: Duration,
}
