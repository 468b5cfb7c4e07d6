use std::sync::Arc;

use rayon::prelude::*;

use crate::config::CriteriaSet;
use crate::journey::Boarding;
use crate::shared::time::Time;
use crate::timetable::entities::{RouteIdx, StopIdx};
use crate::timetable::Timetable;

use super::bag;
use super::label::Label;

/// A label destined for a stop's bag, produced by a route or transfer scan
/// and applied to the shared bag grid afterward.
pub struct Delta {
    pub stop: StopIdx,
    pub label: Label,
}

/// Route traversal for McRAPTOR (§4.4 step 3). For each `(route,
/// boarding_stop)` pair, walks the route forward maintaining a local
/// route-bag: labels already aboard a trip get their arrival/fare advanced
/// (step a), their current snapshot is queued as a candidate for the
/// target stop's bag (step b), the previous round's bag at that stop is
/// merged in as fresh boarding candidates (step c), and any label that can
/// catch an earlier trip is rebound (step d). Only round `k-1` bags
/// (`prev_bags`) are read, so routes are independent and scanned in
/// parallel; the candidate deltas are applied to the shared bag grid
/// afterward in one pass.
pub fn explore_routes(
    timetable: &Timetable,
    q: &[(RouteIdx, StopIdx)],
    prev_bags: &[Vec<Label>],
    target_bound: Time,
    criteria: CriteriaSet,
) -> Vec<Delta> {
    q.par_iter()
        .map_init(Vec::new, |buffer: &mut Vec<Delta>, &(route, board_stop)| {
            let route_entity = timetable.route(route);
            let start_pos = timetable.position_in_route(route, board_stop).unwrap() as usize;

            let mut route_bag: Vec<Label> = Vec::new();

            for &stop in &route_entity.stops[start_pos..] {
                let position = timetable.position_in_route(route, stop).unwrap();

                // Step a: advance every boarded label to this stop.
                for label in route_bag.iter_mut() {
                    if let Boarding::Vehicle(trip) = label.boarding {
                        let stop_time = timetable.trip_stop_time(trip, position);
                        label.arrival = stop_time.arrival;
                    }
                }

                // Step b: queue a candidate merge into this stop's bag.
                for label in &route_bag {
                    if label.arrival < target_bound {
                        buffer.push(Delta {
                            stop,
                            label: label.clone(),
                        });
                    }
                }

                // Step c: merge the previous round's bag at this stop in,
                // offering fresh boarding opportunities.
                for incoming in &prev_bags[stop as usize] {
                    bag::insert(&mut route_bag, incoming.clone(), criteria, false);
                }

                // Step d: rebind to an earlier trip where possible.
                for label in route_bag.iter_mut() {
                    if let Some(trip) = timetable.earliest_trip(route, stop, label.arrival) {
                        if Some(trip) != label.boarding.trip() {
                            let stop_time = timetable.trip_stop_time(trip, position);
                            let predecessor = Arc::new(label.clone());
                            label.predecessor = Some(predecessor);
                            label.boarding = Boarding::Vehicle(trip);
                            label.from_stop = stop;
                            label.departure = stop_time.departure;
                            label.n_trips += 1;
                            label.fare += stop_time.boarding_fare;
                        }
                    }
                }
            }

            std::mem::take(buffer)
        })
        .flatten()
        .collect()
}

/// Transfer relaxation (§4.4 step 4): for every marked stop, shift each of
/// its current-round labels (`curr_bags`) by the transfer layover and
/// queue the result for the destination stop's bag.
pub fn explore_transfers(
    timetable: &Timetable,
    marked: &[StopIdx],
    curr_bags: &[Vec<Label>],
    target_bound: Time,
) -> Vec<Delta> {
    marked
        .par_iter()
        .map_init(Vec::new, |buffer: &mut Vec<Delta>, &stop| {
            for transfer in timetable.transfers_from(stop) {
                for label in &curr_bags[stop as usize] {
                    let arrival = label.arrival + transfer.layover;
                    if arrival >= target_bound {
                        continue;
                    }
                    let predecessor = Arc::new(label.clone());
                    buffer.push(Delta {
                        stop: transfer.to_stop,
                        label: Label {
                            arrival,
                            fare: label.fare,
                            n_trips: label.n_trips,
                            boarding: Boarding::Transfer,
                            from_stop: stop,
                            departure: label.arrival,
                            predecessor: Some(predecessor),
                        },
                    });
                }
            }
            std::mem::take(buffer)
        })
        .flatten()
        .collect()
}
