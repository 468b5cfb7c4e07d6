mod allocator;
pub(crate) mod discovery;
mod explorer;
mod path;
mod state;

pub use allocator::Allocator;
pub use state::Parent;

use std::sync::Arc;

use bitvec::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::journey::Journey;
use crate::shared::time::Time;
use crate::timetable::entities::StopIdx;
use crate::timetable::Timetable;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown station: {0}")]
    UnknownStation(Arc<str>),
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("search cancelled")]
    Cancelled,
}

/// A cooperative cancellation token checked between rounds and between
/// route/transfer scans. No partial results are surfaced on cancellation.
pub trait CancellationToken {
    fn is_cancelled(&self) -> bool;
}

impl CancellationToken for () {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// The outcome of a RAPTOR search: the final `τ*` bound per stop plus the
/// per-round back-pointer state needed to reconstruct a journey to any
/// stop reached within the round cap.
pub struct Solution {
    allocator: Allocator,
}

impl Solution {
    /// Reconstructs the earliest-arrival journey to `stop`, or `None` if
    /// it was never reached within the round cap.
    pub fn journey_to(&self, timetable: &Timetable, stop: StopIdx) -> Option<Journey> {
        let round = self.allocator.best_round[stop as usize]?;
        path::backtrack(timetable, &self.allocator, stop, round)
    }

    /// Destination selection for a station with multiple platform stops:
    /// the platform with minimal `τ*`, ties broken by stable stop index.
    pub fn journey_to_station(&self, timetable: &Timetable, station: u32) -> Option<Journey> {
        timetable
            .stops_of_station(station)
            .iter()
            .filter_map(|&stop| {
                let arrival = self.allocator.tau_star[stop as usize];
                (!arrival.is_infinite()).then_some((stop, arrival))
            })
            .min_by_key(|&(stop, arrival)| (arrival, stop))
            .and_then(|(stop, _)| self.journey_to(timetable, stop))
    }

    pub fn arrival_at(&self, stop: StopIdx) -> Time {
        self.allocator.tau_star[stop as usize]
    }
}

/// Resolves `origin_station` by name and runs [`solve`] from every stop of
/// that station, optionally restricting target pruning to `destination_station`
/// when it is given. The query-level `UnknownStation` error (§7) is only
/// reachable through this name-based entry point — callers that already
/// hold `StopIdx` values use [`solve`]/[`solve_with_targets`] directly.
pub fn solve_by_station_name(
    timetable: &Timetable,
    origin_station: &str,
    destination_station: Option<&str>,
    departure: Time,
    config: &Config,
) -> Result<Solution, Error> {
    let origin = timetable
        .station_by_name(origin_station)
        .ok_or_else(|| Error::UnknownStation(Arc::from(origin_station)))?;
    let targets: Vec<StopIdx> = match destination_station {
        Some(name) => timetable
            .station_by_name(name)
            .ok_or_else(|| Error::UnknownStation(Arc::from(name)))?
            .stops
            .clone(),
        None => Vec::new(),
    };
    solve_with_targets(timetable, &origin.stops, departure, &targets, config)
}

/// Runs the single-criterion (earliest-arrival) RAPTOR search from a set
/// of origin stops, all departing at `departure`.
pub fn solve(
    timetable: &Timetable,
    origins: &[StopIdx],
    departure: Time,
    config: &Config,
) -> Result<Solution, Error> {
    solve_with_targets(timetable, origins, departure, &[], config)
}

/// As [`solve`], but restricts target pruning to the given destination
/// stops (per §4.3, an optional upper bound that short-circuits dominated
/// updates). An empty target set disables pruning regardless of
/// `config.enable_target_pruning`.
pub fn solve_with_targets(
    timetable: &Timetable,
    origins: &[StopIdx],
    departure: Time,
    targets: &[StopIdx],
    config: &Config,
) -> Result<Solution, Error> {
    if origins.is_empty() {
        return Err(Error::InvalidParameter("origin stop set must not be empty"));
    }

    debug!(
        origins = origins.len(),
        targets = targets.len(),
        ?departure,
        max_rounds = config.max_rounds,
        "raptor query"
    );

    let stop_count = timetable.stop_count();
    let max_rounds = config.max_rounds as usize;
    let mut allocator = Allocator::new(stop_count, max_rounds);

    for &origin in origins {
        allocator.curr[origin as usize] = departure;
        allocator.tau_star[origin as usize] = departure;
        allocator.best_round[origin as usize] = Some(0);
        allocator.marked.set(origin as usize, true);
        let idx = 0 * stop_count + origin as usize;
        allocator.parents[idx] = Some(Parent {
            from_stop: origin,
            boarding: crate::journey::Boarding::Origin,
            departure,
            arrival: departure,
        });
    }

    let mut rounds_used = 0;
    for round in 1..=max_rounds {
        if allocator.marked.not_any() {
            break;
        }

        // τ(k, ·) ← τ(k−1, ·); prev already holds round k-1's result from
        // the previous iteration (or the origin seed on round 1).
        allocator.curr.copy_from_slice(&allocator.prev);

        let q = discovery::accumulate_routes(timetable, &allocator.marked);
        allocator.marked.fill(false);

        let target_bound = if config.enable_target_pruning && !targets.is_empty() {
            targets
                .iter()
                .map(|&t| allocator.tau_star[t as usize])
                .min()
                .unwrap_or(Time::INFINITY)
        } else {
            Time::INFINITY
        };

        let route_updates = explorer::explore_routes(
            timetable,
            &q,
            &allocator.prev,
            &allocator.tau_star,
            target_bound,
        );
        allocator.updates = route_updates;
        allocator.apply_updates(round);

        let marked_after_routes: Vec<StopIdx> =
            allocator.marked.iter_ones().map(|i| i as StopIdx).collect();
        let transfer_updates = explorer::explore_transfers(
            timetable,
            &marked_after_routes,
            &allocator.curr,
            &allocator.tau_star,
            target_bound,
        );
        allocator.updates = transfer_updates;
        allocator.apply_updates(round);

        allocator.prev.copy_from_slice(&allocator.curr);
        rounds_used = round;
    }

    if rounds_used == max_rounds && allocator.marked.any() {
        warn!(max_rounds, "raptor query exhausted round cap");
    }

    Ok(Solution { allocator })
}
