pub mod builder;
pub mod entities;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::shared::time::Time;

pub use builder::{build, BuildError, RawStation, RawStop, RawTransfer, RawTrip, RawTripStopTime};
use entities::{Route, RouteIdx, Station, StationIdx, Stop, StopIdx, Transfer, Trip, TripIdx, TripStopTime};
pub use entities::{Route as RouteEntity, Station as StationEntity, Stop as StopEntity, Trip as TripEntity};

/// The in-memory timetable: every entity arena plus the derived indices
/// that make per-round RAPTOR traversal linear in the number of scanned
/// route-stops. Built once by [`build`], then treated as read-only —
/// queries never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timetable {
    pub(crate) stations: Vec<Station>,
    pub(crate) stops: Vec<Stop>,
    pub(crate) trips: Vec<Trip>,
    pub(crate) routes: Vec<Route>,

    pub(crate) station_index_by_id: HashMap<Arc<str>, StationIdx>,
    pub(crate) routes_by_stop: Vec<Vec<RouteIdx>>,
    pub(crate) stop_index_within_route: HashMap<(RouteIdx, StopIdx), u16>,
    pub(crate) transfer_by_pair: HashMap<(StopIdx, StopIdx), Transfer>,
    /// Transfers grouped by origin stop, for the relaxation step's hot
    /// loop — avoids a full hashmap scan per marked stop.
    pub(crate) transfers_by_from: Vec<Vec<Transfer>>,
}

impl Timetable {
    pub fn station_by_name(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|station| &*station.name == name)
    }

    pub fn station_by_id(&self, id: &str) -> Option<&Station> {
        self.station_index_by_id
            .get(id)
            .map(|&idx| &self.stations[idx as usize])
    }

    pub fn station(&self, index: StationIdx) -> &Station {
        &self.stations[index as usize]
    }

    pub fn stop(&self, index: StopIdx) -> &Stop {
        &self.stops[index as usize]
    }

    pub fn trip(&self, index: TripIdx) -> &Trip {
        &self.trips[index as usize]
    }

    pub fn route(&self, index: RouteIdx) -> &Route {
        &self.routes[index as usize]
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn stops_of_station(&self, station: StationIdx) -> &[StopIdx] {
        &self.stations[station as usize].stops
    }

    pub fn routes_of_stop(&self, stop: StopIdx) -> &[RouteIdx] {
        &self.routes_by_stop[stop as usize]
    }

    /// Returns the stop's 0-based position within the route, or `None` if
    /// it isn't on the route.
    pub fn position_in_route(&self, route: RouteIdx, stop: StopIdx) -> Option<u16> {
        self.stop_index_within_route.get(&(route, stop)).copied()
    }

    pub fn trip_stop_time(&self, trip: TripIdx, position: u16) -> &TripStopTime {
        &self.trips[trip as usize].stop_times[position as usize]
    }

    /// Returns the trip of `route` whose departure at `stop` is `>=
    /// lower_bound` and minimal, or `None` if no such trip exists.
    ///
    /// The route's trips are already FIFO-sorted (asserted at build time),
    /// so a trip departs no earlier than the previous one at every
    /// position — a `partition_point` binary search over departures at
    /// this stop's position locates the answer in `O(log |trips(route)|)`
    /// rather than a linear scan.
    pub fn earliest_trip(&self, route: RouteIdx, stop: StopIdx, lower_bound: Time) -> Option<TripIdx> {
        let position = self.position_in_route(route, stop)?;
        let route = &self.routes[route as usize];
        let idx = route.trips.partition_point(|&trip_idx| {
            self.trips[trip_idx as usize].stop_times[position as usize].departure < lower_bound
        });
        route.trips.get(idx).copied()
    }

    pub fn transfer(&self, from: StopIdx, to: StopIdx) -> Option<&Transfer> {
        self.transfer_by_pair.get(&(from, to))
    }

    pub fn transfers_from(&self, from: StopIdx) -> &[Transfer] {
        &self.transfers_by_from[from as usize]
    }

    /// Every `(trip, stop_time)` pair departing `stop` within `[t_min,
    /// t_max]`, across every route serving the stop. Used only by the
    /// range driver to enumerate candidate departure times.
    pub fn trips_departing(
        &self,
        stop: StopIdx,
        t_min: Time,
        t_max: Time,
    ) -> Vec<(TripIdx, TripStopTime)> {
        let mut result = Vec::new();
        for &route_idx in self.routes_of_stop(stop) {
            let Some(position) = self.position_in_route(route_idx, stop) else {
                continue;
            };
            let route = &self.routes[route_idx as usize];
            let start = route.trips.partition_point(|&trip_idx| {
                self.trips[trip_idx as usize].stop_times[position as usize].departure < t_min
            });
            for &trip_idx in &route.trips[start..] {
                let stop_time = self.trips[trip_idx as usize].stop_times[position as usize];
                if stop_time.departure > t_max {
                    break;
                }
                result.push((trip_idx, stop_time));
            }
        }
        result
    }
}
