use crate::journey::{prune_interior_transfers, Boarding, Journey, Leg};
use crate::timetable::entities::StopIdx;
use crate::timetable::Timetable;

use super::allocator::Allocator;

/// Walks `from_stop` back-pointers from `(target_round, target_stop)` to
/// the origin, emitting legs in reverse and then reversing the result.
/// `Boarding::Origin` is the sentinel written at every origin stop before
/// round 0 and marks where the walk stops.
pub fn backtrack(
    timetable: &Timetable,
    allocator: &Allocator,
    target_stop: StopIdx,
    target_round: usize,
) -> Option<Journey> {
    let mut legs_rev: Vec<Leg> = Vec::new();
    let mut current_stop = target_stop;
    let mut current_round = target_round;
    let mut origin_parent = None;

    loop {
        let parent = allocator.parent(current_round, current_stop)?;
        if let Boarding::Origin = parent.boarding {
            origin_parent = Some(parent);
            break;
        }

        legs_rev.push(Leg {
            from_stop: parent.from_stop,
            to_stop: current_stop,
            boarding: parent.boarding,
            departure: parent.departure,
            arrival: parent.arrival,
            fare: 0,
            n_trips: 0,
        });

        if parent.boarding.is_vehicle() {
            if current_round == 0 {
                break;
            }
            current_round -= 1;
        }
        current_stop = parent.from_stop;
    }

    legs_rev.reverse();
    annotate_running_totals(timetable, &mut legs_rev);
    let mut legs = prune_interior_transfers(legs_rev, timetable);

    // Destination equal to origin (or reached at round 0 with no boardings):
    // the walk terminates at the origin sentinel without ever pushing a
    // leg. Per §8's boundary behavior, this is a zero-length journey whose
    // arrival equals τ₀, not an empty one with no times at all — represent
    // it with a single degenerate origin leg rather than leaving `legs`
    // empty and indistinguishable from "unreached".
    if legs.is_empty() {
        let origin_parent = origin_parent.expect("loop always records the terminating origin parent");
        legs.push(Leg {
            from_stop: target_stop,
            to_stop: target_stop,
            boarding: Boarding::Origin,
            departure: origin_parent.departure,
            arrival: origin_parent.arrival,
            fare: 0,
            n_trips: 0,
        });
    }

    Some(Journey { legs })
}

/// Fills in the cumulative `fare`/`n_trips` fields the backtrack loop
/// leaves at zero, since those accumulate forward along the journey while
/// reconstruction walks backward.
pub(crate) fn annotate_running_totals(timetable: &Timetable, legs: &mut [Leg]) {
    let mut fare = 0;
    let mut n_trips = 0;
    for leg in legs.iter_mut() {
        if let Boarding::Vehicle(trip) = leg.boarding {
            n_trips += 1;
            let route = timetable.trip(trip).route;
            if let Some(position) = timetable.position_in_route(route, leg.from_stop) {
                fare += timetable.trip_stop_time(trip, position).boarding_fare;
            }
        }
        leg.fare = fare;
        leg.n_trips = n_trips;
    }
}
