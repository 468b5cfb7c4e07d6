use rayon::prelude::*;

use crate::shared::time::Time;
use crate::timetable::entities::{RouteIdx, StopIdx};
use crate::timetable::Timetable;

use crate::journey::Boarding;

use super::allocator::LazyBuffer;
use super::state::{Parent, Update};

/// Route traversal: for each `(route, boarding_stop)` pair produced by
/// `accumulate_routes`, walk the route's stops forward, riding the
/// currently-boarded trip and hopping to an earlier one whenever
/// `earliest_trip` finds a better option. Each route is independent of
/// every other (it only reads round `k-1` state and only produces
/// candidate updates for its own stops), so routes are scanned in
/// parallel and the results applied to the shared arrays afterward.
pub fn explore_routes(
    timetable: &Timetable,
    q: &[(RouteIdx, StopIdx)],
    prev: &[Time],
    tau_star: &[Time],
    target_bound: Time,
) -> Vec<Update> {
    q.par_iter()
        .map_init(LazyBuffer::new, |buffer, &(route, board_stop)| {
            let route_entity = timetable.route(route);
            let start_pos = timetable.position_in_route(route, board_stop).unwrap() as usize;

            let mut boarded: Option<u32> = None;
            let mut boarding_stop = board_stop;
            let mut boarding_departure = Time::INFINITY;

            for &stop in &route_entity.stops[start_pos..] {
                let position = timetable.position_in_route(route, stop).unwrap();

                if let Some(trip) = boarded {
                    let arrival = timetable.trip_stop_time(trip, position).arrival;
                    let bound = tau_star[stop as usize].min(target_bound);
                    if arrival < bound {
                        buffer.push(Update {
                            stop,
                            arrival,
                            parent: Parent {
                                from_stop: boarding_stop,
                                boarding: Boarding::Vehicle(trip),
                                departure: boarding_departure,
                                arrival,
                            },
                        });
                    }
                }

                let catch_up_bound = prev[stop as usize];
                let departs_no_later = match boarded {
                    None => true,
                    Some(trip) => catch_up_bound <= timetable.trip_stop_time(trip, position).departure,
                };
                if departs_no_later {
                    if let Some(candidate) = timetable.earliest_trip(route, stop, catch_up_bound) {
                        if Some(candidate) != boarded {
                            boarded = Some(candidate);
                            boarding_stop = stop;
                            boarding_departure = timetable.trip_stop_time(candidate, position).departure;
                        }
                    }
                }
            }

            buffer.swap()
        })
        .flatten()
        .collect()
}

/// Transfer relaxation over the stops marked by this round's route
/// traversal. Each marked stop's transfers only read that stop's own
/// current label and only write candidate updates for its transfer
/// targets, so the scan is likewise parallel.
pub fn explore_transfers(
    timetable: &Timetable,
    marked: &[StopIdx],
    curr: &[Time],
    tau_star: &[Time],
    target_bound: Time,
) -> Vec<Update> {
    marked
        .par_iter()
        .map_init(LazyBuffer::new, |buffer, &stop| {
            let departure = curr[stop as usize];
            for transfer in timetable.transfers_from(stop) {
                let arrival = departure + transfer.layover;
                let bound = tau_star[transfer.to_stop as usize].min(target_bound);
                if arrival < bound {
                    buffer.push(Update {
                        stop: transfer.to_stop,
                        arrival,
                        parent: Parent {
                            from_stop: stop,
                            boarding: Boarding::Transfer,
                            departure,
                            arrival,
                        },
                    });
                }
            }
            buffer.swap()
        })
        .flatten()
        .collect()
}
