use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::shared::time::{Duration, Time};

use super::entities::{Route, RouteIdx, Station, StationIdx, Stop, StopIdx, Trip, TripStopTime};
use super::Timetable;

/// A station as seen by an external schedule feed, before dense indices are
/// assigned.
#[derive(Debug, Clone)]
pub struct RawStation {
    pub id: Arc<str>,
    pub name: Arc<str>,
}

#[derive(Debug, Clone)]
pub struct RawStop {
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub station_id: Arc<str>,
    pub platform_code: Option<Arc<str>>,
}

#[derive(Debug, Clone)]
pub struct RawTripStopTime {
    pub stop_id: Arc<str>,
    pub arrival: Time,
    pub departure: Time,
    pub boarding_fare: i32,
}

#[derive(Debug, Clone)]
pub struct RawTrip {
    pub id: Arc<str>,
    pub short_name: Option<Arc<str>>,
    pub headsign: Option<Arc<str>>,
    pub stop_times: Vec<RawTripStopTime>,
}

/// An explicit transfer record from the feed, overriding the default
/// layover the builder would otherwise materialize for a same-station stop
/// pair (or, per the extensibility note in the data model, introducing an
/// inter-station transfer the default pass never would).
#[derive(Debug, Clone)]
pub struct RawTransfer {
    pub from_stop_id: Arc<str>,
    pub to_stop_id: Arc<str>,
    pub min_transfer_time: Duration,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("trip {trip_id} has fewer than two stop times")]
    ZeroLengthTrip { trip_id: Arc<str> },

    #[error("trip {trip_id} visits stop {stop_id} more than once")]
    DuplicateStop { trip_id: Arc<str>, stop_id: Arc<str> },

    #[error("trip {trip_id} has non-monotone times at position {position}")]
    NonMonotoneTimes { trip_id: Arc<str>, position: u16 },

    #[error("trip {trip_id} references unknown stop {stop_id}")]
    UnknownStop { trip_id: Arc<str>, stop_id: Arc<str> },

    #[error("stop {stop_id} references unknown parent station {station_id}")]
    UnknownStation {
        stop_id: Arc<str>,
        station_id: Arc<str>,
    },

    #[error("stop {stop_id} is orphaned (no parent station)")]
    OrphanedStop { stop_id: Arc<str> },

    #[error(
        "route with stop pattern {pattern:?} has overtaking trips {earlier} and {later}: \
         {earlier} departs first at position 0 but {later} departs no later at position {position}"
    )]
    Overtaking {
        pattern: Vec<Arc<str>>,
        earlier: Arc<str>,
        later: Arc<str>,
        position: u16,
    },

    #[error("transfer references unknown stop {stop_id}")]
    UnknownTransferStop { stop_id: Arc<str> },
}

/// Builds a [`Timetable`] from raw feed entities. Runs once; every failure
/// is fatal and aborts the build.
///
/// Mirrors the build contract named in the external interfaces: raw
/// stations and stops first establish the station/stop arenas, raw trips
/// are grouped into routes (asserting the FIFO property per route), and
/// same-station transfers are materialized at `default_transfer_seconds`
/// unless overridden by an explicit `raw_transfers` entry.
pub fn build(
    raw_stations: &[RawStation],
    raw_stops: &[RawStop],
    raw_trips: &[RawTrip],
    raw_transfers: &[RawTransfer],
    default_transfer_seconds: i32,
) -> Result<Timetable, BuildError> {
    let mut stations: Vec<Station> = Vec::with_capacity(raw_stations.len());
    let mut station_index_by_id: HashMap<Arc<str>, StationIdx> =
        HashMap::with_capacity(raw_stations.len());
    for raw in raw_stations {
        let index = stations.len() as StationIdx;
        station_index_by_id.insert(raw.id.clone(), index);
        stations.push(Station {
            index,
            id: raw.id.clone(),
            name: raw.name.clone(),
            stops: Vec::new(),
        });
    }

    let mut stops: Vec<Stop> = Vec::with_capacity(raw_stops.len());
    let mut stop_index_by_id: HashMap<Arc<str>, StopIdx> = HashMap::with_capacity(raw_stops.len());
    for raw in raw_stops {
        if raw.station_id.is_empty() {
            let err = BuildError::OrphanedStop {
                stop_id: raw.id.clone(),
            };
            error!(%err, "timetable build failed");
            return Err(err);
        }
        let station_idx = *station_index_by_id.get(&raw.station_id).ok_or_else(|| {
            let err = BuildError::UnknownStation {
                stop_id: raw.id.clone(),
                station_id: raw.station_id.clone(),
            };
            error!(%err, "timetable build failed");
            err
        })?;

        let index = stops.len() as StopIdx;
        stop_index_by_id.insert(raw.id.clone(), index);
        stops.push(Stop {
            index,
            id: raw.id.clone(),
            name: raw.name.clone(),
            platform_code: raw.platform_code.clone(),
            station: station_idx,
        });
        stations[station_idx as usize].stops.push(index);
    }

    let mut trips: Vec<Trip> = Vec::with_capacity(raw_trips.len());
    // Route pattern (ordered stop indices) -> route index, assigned in
    // first-appearance order so the build is deterministic given
    // deterministic input.
    let mut route_index_by_pattern: HashMap<Vec<StopIdx>, usize> = HashMap::new();
    let mut route_patterns: Vec<Vec<StopIdx>> = Vec::new();
    let mut route_trip_sets: Vec<Vec<u32>> = Vec::new();

    for raw in raw_trips {
        if raw.stop_times.len() < 2 {
            let err = BuildError::ZeroLengthTrip {
                trip_id: raw.id.clone(),
            };
            error!(%err, "timetable build failed");
            return Err(err);
        }

        let mut stop_times = Vec::with_capacity(raw.stop_times.len());
        let mut seen_stops: HashMap<StopIdx, ()> = HashMap::with_capacity(raw.stop_times.len());
        let mut pattern = Vec::with_capacity(raw.stop_times.len());
        let mut prev_departure: Option<Time> = None;

        for (position, rst) in raw.stop_times.iter().enumerate() {
            let position = position as u16;
            let stop_idx = *stop_index_by_id.get(&rst.stop_id).ok_or_else(|| {
                let err = BuildError::UnknownStop {
                    trip_id: raw.id.clone(),
                    stop_id: rst.stop_id.clone(),
                };
                error!(%err, "timetable build failed");
                err
            })?;

            if seen_stops.insert(stop_idx, ()).is_some() {
                let err = BuildError::DuplicateStop {
                    trip_id: raw.id.clone(),
                    stop_id: rst.stop_id.clone(),
                };
                error!(%err, "timetable build failed");
                return Err(err);
            }

            if rst.arrival > rst.departure {
                let err = BuildError::NonMonotoneTimes {
                    trip_id: raw.id.clone(),
                    position,
                };
                error!(%err, "timetable build failed");
                return Err(err);
            }
            if let Some(prev_dep) = prev_departure {
                if prev_dep > rst.arrival {
                    let err = BuildError::NonMonotoneTimes {
                        trip_id: raw.id.clone(),
                        position,
                    };
                    error!(%err, "timetable build failed");
                    return Err(err);
                }
            }
            prev_departure = Some(rst.departure);

            pattern.push(stop_idx);
            stop_times.push(TripStopTime {
                position,
                stop: stop_idx,
                arrival: rst.arrival,
                departure: rst.departure,
                boarding_fare: rst.boarding_fare,
            });
        }

        let trip_idx = trips.len() as u32;
        let route_idx = *route_index_by_pattern
            .entry(pattern.clone())
            .or_insert_with(|| {
                let idx = route_patterns.len();
                route_patterns.push(pattern);
                route_trip_sets.push(Vec::new());
                idx
            });
        route_trip_sets[route_idx].push(trip_idx);

        trips.push(Trip {
            index: trip_idx,
            id: raw.id.clone(),
            route: route_idx as RouteIdx,
            short_name: raw.short_name.clone(),
            headsign: raw.headsign.clone(),
            stop_times,
        });
    }

    let mut routes: Vec<Route> = Vec::with_capacity(route_patterns.len());
    for (route_idx, (pattern, mut trip_indices)) in route_patterns
        .into_iter()
        .zip(route_trip_sets.into_iter())
        .enumerate()
    {
        trip_indices.sort_by_key(|&trip_idx| trips[trip_idx as usize].stop_times[0].departure);

        for window in trip_indices.windows(2) {
            let (earlier, later) = (window[0], window[1]);
            let earlier_trip = &trips[earlier as usize];
            let later_trip = &trips[later as usize];
            for position in 0..pattern.len() {
                if earlier_trip.stop_times[position].departure
                    > later_trip.stop_times[position].departure
                {
                    let err = BuildError::Overtaking {
                        pattern: pattern
                            .iter()
                            .map(|&idx| stops[idx as usize].id.clone())
                            .collect(),
                        earlier: earlier_trip.id.clone(),
                        later: later_trip.id.clone(),
                        position: position as u16,
                    };
                    error!(%err, "timetable build failed");
                    return Err(err);
                }
            }
        }

        for &trip_idx in &trip_indices {
            trips[trip_idx as usize].route = route_idx as RouteIdx;
        }

        routes.push(Route {
            index: route_idx as RouteIdx,
            stops: Arc::from(pattern.into_boxed_slice()),
            trips: trip_indices,
        });
    }

    let mut routes_by_stop: Vec<Vec<RouteIdx>> = vec![Vec::new(); stops.len()];
    let mut stop_index_within_route: HashMap<(RouteIdx, StopIdx), u16> = HashMap::new();
    for route in &routes {
        for (position, &stop_idx) in route.stops.iter().enumerate() {
            routes_by_stop[stop_idx as usize].push(route.index);
            stop_index_within_route.insert((route.index, stop_idx), position as u16);
        }
    }
    for routes in &mut routes_by_stop {
        routes.sort_unstable();
        routes.dedup();
    }

    let mut transfer_by_pair: HashMap<(StopIdx, StopIdx), super::entities::Transfer> =
        HashMap::new();
    let default_layover = Duration::from_seconds(default_transfer_seconds);
    for station in &stations {
        for &from in &station.stops {
            for &to in &station.stops {
                if from == to {
                    continue;
                }
                transfer_by_pair.insert(
                    (from, to),
                    super::entities::Transfer {
                        from_stop: from,
                        to_stop: to,
                        layover: default_layover,
                    },
                );
            }
        }
    }
    for raw in raw_transfers {
        let from = *stop_index_by_id
            .get(&raw.from_stop_id)
            .ok_or_else(|| BuildError::UnknownTransferStop {
                stop_id: raw.from_stop_id.clone(),
            })?;
        let to = *stop_index_by_id
            .get(&raw.to_stop_id)
            .ok_or_else(|| BuildError::UnknownTransferStop {
                stop_id: raw.to_stop_id.clone(),
            })?;
        transfer_by_pair.insert(
            (from, to),
            super::entities::Transfer {
                from_stop: from,
                to_stop: to,
                layover: raw.min_transfer_time,
            },
        );
    }

    let mut transfers_by_from: Vec<Vec<super::entities::Transfer>> = vec![Vec::new(); stops.len()];
    for transfer in transfer_by_pair.values() {
        transfers_by_from[transfer.from_stop as usize].push(*transfer);
    }

    info!(
        stations = stations.len(),
        stops = stops.len(),
        trips = trips.len(),
        routes = routes.len(),
        transfers = transfer_by_pair.len(),
        "timetable built"
    );

    Ok(Timetable {
        stations,
        stops,
        trips,
        routes,
        station_index_by_id,
        routes_by_stop,
        stop_index_within_route,
        transfer_by_pair,
        transfers_by_from,
    })
}
