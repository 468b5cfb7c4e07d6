//! Range-query driver (§4.6): repeats a RAPTOR or McRAPTOR search across
//! every candidate departure in a window and keeps, per destination
//! station, the Pareto-optimal set of journeys under the criteria
//! `(-departure_time, arrival_time, fare, n_trips)` — later departures are
//! preferred only when nothing else is lost, matching the dominance rule
//! of §4.4 with departure time folded in as an extra, negated criterion.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, CriteriaSet};
use crate::journey::Journey;
use crate::mcraptor;
use crate::raptor;
use crate::shared::time::Time;
use crate::timetable::entities::{StationIdx, StopIdx};
use crate::timetable::Timetable;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown station: {0}")]
    UnknownStation(Arc<str>),
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Which per-round search the driver repeats at every candidate
/// departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Earliest-arrival RAPTOR — at most one journey per destination per
    /// candidate departure.
    EarliestArrival,
    /// Multi-criteria McRAPTOR — a Pareto set per destination per
    /// candidate departure.
    MultiCriteria,
}

/// Every Pareto-optimal journey found across the window, keyed by
/// destination station.
pub type RangeResult = HashMap<StationIdx, Vec<Journey>>;

/// Runs `mode` once per candidate departure in `[window.0, window.1]` from
/// every stop of `origin_station`, and returns the Pareto-optimal journeys
/// to each destination station (or, if `destination_station` is given,
/// only to that one).
///
/// Candidates are scanned latest-first (§4.6's rationale: a later
/// departure's result can prune an earlier one that neither arrives
/// sooner nor improves another criterion), but since each candidate's
/// search is independent of the others, the scan itself runs concurrently
/// over a work-stealing pool (§5) and only the per-destination merge step
/// is serialized.
pub fn solve(
    timetable: &Timetable,
    origin_station: &str,
    destination_station: Option<&str>,
    window: (Time, Time),
    mode: Mode,
    config: &Config,
) -> Result<RangeResult, Error> {
    let (lo, hi) = window;
    if lo > hi {
        return Err(Error::InvalidParameter("departure window is empty"));
    }
    let origin = timetable
        .station_by_name(origin_station)
        .ok_or_else(|| Error::UnknownStation(Arc::from(origin_station)))?;
    if origin.stops.is_empty() {
        return Err(Error::InvalidParameter("origin station has no stops"));
    }

    let destination = match destination_station {
        Some(name) => Some(
            timetable
                .station_by_name(name)
                .ok_or_else(|| Error::UnknownStation(Arc::from(name)))?
                .index,
        ),
        None => None,
    };

    let origins = &origin.stops;
    let targets: Vec<StopIdx> = match destination {
        Some(station) => timetable.stops_of_station(station).to_vec(),
        None => Vec::new(),
    };

    // §4.6 step 1: candidate departures, latest first.
    let mut departures: Vec<Time> = origins
        .iter()
        .flat_map(|&stop| timetable.trips_departing(stop, lo, hi))
        .map(|(_, stop_time)| stop_time.departure)
        .collect();
    departures.sort_unstable_by(|a, b| b.cmp(a));
    departures.dedup();

    debug!(
        origin = origin_station,
        ?destination_station,
        candidates = departures.len(),
        ?mode,
        "range query"
    );

    // §4.6 step 2: one independent search per candidate.
    let per_departure: Vec<Vec<(StationIdx, Journey)>> = departures
        .par_iter()
        .map(|&departure| run_one(timetable, origins, &targets, destination, departure, mode, config))
        .collect();

    // §4.6 step 3: serialize merges into the shared per-destination Pareto
    // collections. `keep_equal = true` per §9's resolution of the open
    // question: range queries keep distinct journeys tied on every
    // criterion (e.g. two equally good departures).
    let mut result: RangeResult = HashMap::new();
    for journeys in per_departure {
        for (station, journey) in journeys {
            let bucket = result.entry(station).or_default();
            insert(bucket, journey, config.criteria, true);
        }
    }
    Ok(result)
}

fn run_one(
    timetable: &Timetable,
    origins: &[StopIdx],
    targets: &[StopIdx],
    destination: Option<StationIdx>,
    departure: Time,
    mode: Mode,
    config: &Config,
) -> Vec<(StationIdx, Journey)> {
    let stations: Vec<StationIdx> = match destination {
        Some(station) => vec![station],
        None => (0..timetable.station_count() as StationIdx).collect(),
    };

    match mode {
        Mode::EarliestArrival => {
            let Ok(solution) = raptor::solve_with_targets(timetable, origins, departure, targets, config) else {
                return Vec::new();
            };
            stations
                .into_iter()
                .filter_map(|station| solution.journey_to_station(timetable, station).map(|j| (station, j)))
                .collect()
        }
        Mode::MultiCriteria => {
            let Ok(solution) = mcraptor::solve_with_targets(timetable, origins, departure, targets, config) else {
                return Vec::new();
            };
            stations
                .into_iter()
                .flat_map(|station| {
                    solution
                        .journeys_to_station(timetable, station)
                        .into_iter()
                        .map(move |journey| (station, journey))
                })
                .collect()
        }
    }
}

/// The journey-level criteria tuple of §4.6 step 3: negated departure (so
/// a later departure sorts as "smaller", i.e. preferred), arrival time,
/// and — when the caller's `CriteriaSet` tracks them — fare and boarding
/// count. Times fit comfortably in `i64`, so negation never overflows.
fn criteria_tuple(journey: &Journey, criteria: CriteriaSet) -> (i64, i64, i64, u64) {
    let departure = journey.departure_time().map(|t| t.as_seconds() as i64).unwrap_or(0);
    let arrival = journey.arrival_time().map(|t| t.as_seconds() as i64).unwrap_or(0);
    let fare = if criteria.fare { journey.fare() as i64 } else { 0 };
    let n_trips = if criteria.boardings { journey.n_trips() as u64 } else { 0 };
    (-departure, arrival, fare, n_trips)
}

fn dominates(a: &Journey, b: &Journey, criteria: CriteriaSet) -> bool {
    let a = criteria_tuple(a, criteria);
    let b = criteria_tuple(b, criteria);
    a.0 <= b.0 && a.1 <= b.1 && a.2 <= b.2 && a.3 <= b.3 && a != b
}

fn ties_with(a: &Journey, b: &Journey, criteria: CriteriaSet) -> bool {
    criteria_tuple(a, criteria) == criteria_tuple(b, criteria)
}

/// `pareto_merge` of §4.4, specialized to journeys and a single insertion
/// at a time: drops `candidate` if an existing journey already dominates
/// it (or ties with it and `keep_equal` is off), otherwise evicts whatever
/// `candidate` dominates and keeps it.
fn insert(bag: &mut Vec<Journey>, candidate: Journey, criteria: CriteriaSet, keep_equal: bool) -> bool {
    for existing in bag.iter() {
        if dominates(existing, &candidate, criteria) {
            return false;
        }
        if !keep_equal && ties_with(existing, &candidate, criteria) {
            return false;
        }
    }
    bag.retain(|existing| !dominates(&candidate, existing, criteria));
    bag.push(candidate);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::Boarding;

    fn journey(departure: i32, arrival: i32, fare: i32, n_trips: u32) -> Journey {
        Journey {
            legs: vec![crate::journey::Leg {
                from_stop: 0,
                to_stop: 1,
                boarding: Boarding::Vehicle(0),
                departure: Time::from_seconds(departure),
                arrival: Time::from_seconds(arrival),
                fare,
                n_trips,
            }],
        }
    }

    #[test]
    fn later_departure_with_same_arrival_dominates_earlier() {
        let mut bag = vec![journey(28800, 30000, 0, 1)];
        let changed = insert(&mut bag, journey(29000, 30000, 0, 1), CriteriaSet::all(), true);
        assert!(changed);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag[0].departure_time().unwrap().as_seconds(), 29000);
    }

    #[test]
    fn earlier_arrival_survives_alongside_later_departure() {
        let mut bag = vec![journey(28800, 29500, 0, 1)];
        let changed = insert(&mut bag, journey(29000, 30000, 0, 1), CriteriaSet::all(), true);
        assert!(changed);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn identical_journeys_kept_only_when_keep_equal() {
        let mut bag = vec![journey(28800, 30000, 0, 1)];
        assert!(!insert(&mut bag, journey(28800, 30000, 0, 1), CriteriaSet::all(), false));
        assert!(insert(&mut bag, journey(28800, 30000, 0, 1), CriteriaSet::all(), true));
        assert_eq!(bag.len(), 2);
    }
}
