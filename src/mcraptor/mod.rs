//! The multi-criteria extension of RAPTOR (§4.4): instead of a single
//! earliest-arrival label per `(round, stop)`, each holds a Pareto
//! antichain of labels over `(arrival_time, fare, n_trips)`.

mod allocator;
mod bag;
mod explorer;
mod label;
mod path;

pub use label::Label;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, CriteriaSet};
use crate::journey::Journey;
use crate::shared::time::Time;
use crate::timetable::entities::{StationIdx, StopIdx};
use crate::timetable::Timetable;

use allocator::Allocator;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown station: {0}")]
    UnknownStation(Arc<str>),
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("search cancelled")]
    Cancelled,
}

/// The outcome of a McRAPTOR search: the full per-round bag grid, kept for
/// the lifetime of the query since reconstruction (§4.5) follows each
/// surviving label's own predecessor chain.
pub struct Solution {
    allocator: Allocator,
    final_round: usize,
    criteria: CriteriaSet,
}

impl Solution {
    /// Every Pareto-optimal journey to `stop`, derived from the final
    /// round's bag there.
    pub fn journeys_to(&self, timetable: &Timetable, stop: StopIdx) -> Vec<Journey> {
        self.allocator
            .bag(self.final_round, stop)
            .iter()
            .map(|label| path::reconstruct(timetable, label, stop))
            .collect()
    }

    /// As [`journeys_to`](Self::journeys_to), but collects over every
    /// platform of a station and re-derives the Pareto front across them,
    /// since a label non-dominated on one platform may be dominated by one
    /// reaching a sibling platform.
    pub fn journeys_to_station(&self, timetable: &Timetable, station: StationIdx) -> Vec<Journey> {
        // Candidates carry their originating stop alongside the label itself
        // so the Pareto re-merge across platforms doesn't need to recover
        // which stop a surviving label came from after the fact.
        let mut front: Vec<(StopIdx, Label)> = Vec::new();

        for &stop in timetable.stops_of_station(station) {
            for label in self.allocator.bag(self.final_round, stop) {
                let candidate = label.clone();
                let rejected = front.iter().any(|(_, existing)| {
                    existing.dominates(&candidate, self.criteria) || existing.ties_with(&candidate, self.criteria)
                });
                if rejected {
                    continue;
                }
                front.retain(|(_, existing)| !candidate.dominates(existing, self.criteria));
                front.push((stop, candidate));
            }
        }

        front
            .iter()
            .map(|(stop, label)| path::reconstruct(timetable, label, *stop))
            .collect()
    }

    pub fn bag_at(&self, stop: StopIdx) -> &[Label] {
        self.allocator.bag(self.final_round, stop)
    }
}

/// Resolves `origin_station` (and, if given, `destination_station`) by
/// name and runs [`solve`] from every stop of the origin station. The
/// query-level `UnknownStation` error (§7) is only reachable through this
/// name-based entry point.
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

/// Runs the multi-criteria McRAPTOR search from a set of origin stops, all
/// departing at `departure`.
pub fn solve(timetable: &Timetable, origins: &[StopIdx], departure: Time, config: &Config) -> Result<Solution, Error> {
    solve_with_targets(timetable, origins, departure, &[], config)
}

/// As [`solve`], restricted to target pruning against `targets` (empty
/// disables the optimization, matching §4.3).
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
        "mcraptor query"
    );

    let stop_count = timetable.stop_count();
    let max_rounds = config.max_rounds as usize;
    let mut allocator = Allocator::new(stop_count, max_rounds);

    for &origin in origins {
        bag::insert(
            allocator.bag_mut(0, origin),
            Label::origin(origin, departure),
            config.criteria,
            false,
        );
        allocator.marked.set(origin as usize, true);
    }

    let mut rounds_used = 0;
    for round in 1..=max_rounds {
        if allocator.marked.not_any() {
            break;
        }

        allocator.copy_round(round - 1, round);

        let q = crate::raptor::discovery::accumulate_routes(timetable, &allocator.marked);
        allocator.marked.fill(false);

        let target_bound = if config.enable_target_pruning && !targets.is_empty() {
            targets
                .iter()
                .flat_map(|&t| allocator.bag(round - 1, t).iter().map(|label| label.arrival))
                .min()
                .unwrap_or(Time::INFINITY)
        } else {
            Time::INFINITY
        };

        let prev_bags = allocator.bags[(round - 1) * stop_count..round * stop_count].to_vec();
        let route_deltas = explorer::explore_routes(timetable, &q, &prev_bags, target_bound, config.criteria);
        for delta in route_deltas {
            if bag::insert(allocator.bag_mut(round, delta.stop), delta.label, config.criteria, false) {
                allocator.marked.set(delta.stop as usize, true);
            }
        }

        let marked_after_routes: Vec<StopIdx> = allocator.marked.iter_ones().map(|i| i as StopIdx).collect();
        let curr_bags = allocator.bags[round * stop_count..(round + 1) * stop_count].to_vec();
        let transfer_deltas = explorer::explore_transfers(timetable, &marked_after_routes, &curr_bags, target_bound);
        for delta in transfer_deltas {
            if bag::insert(allocator.bag_mut(round, delta.stop), delta.label, config.criteria, false) {
                allocator.marked.set(delta.stop as usize, true);
            }
        }

        rounds_used = round;
    }

    if rounds_used == max_rounds && allocator.marked.any() {
        warn!(max_rounds, "mcraptor query exhausted round cap");
    }

    Ok(Solution {
        allocator,
        final_round: rounds_used,
        criteria: config.criteria,
    })
}
