use crate::journey::{prune_interior_transfers, Boarding, Journey, Leg};
use crate::timetable::entities::StopIdx;
use crate::timetable::Timetable;

use super::label::Label;

/// Walks a label's `predecessor` chain back to its origin, emitting legs
/// in reverse and then reversing the result. Unlike RAPTOR's
/// back-pointer matrix, each label already carries its own predecessor
/// directly (§4.4's bag history makes this unambiguous: a label's
/// predecessor is exactly the label it was extended from), so
/// reconstruction never needs to re-scan earlier bags.
pub fn reconstruct(timetable: &Timetable, label: &Label, destination: StopIdx) -> Journey {
    let mut legs_rev: Vec<Leg> = Vec::new();
    let mut to_stop = destination;
    let mut current = label;

    loop {
        if let Boarding::Origin = current.boarding {
            break;
        }

        legs_rev.push(Leg {
            from_stop: current.from_stop,
            to_stop,
            boarding: current.boarding,
            departure: current.departure,
            arrival: current.arrival,
            fare: current.fare,
            n_trips: current.n_trips,
        });

        to_stop = current.from_stop;
        match &current.predecessor {
            Some(predecessor) => current = predecessor,
            None => break,
        }
    }

    legs_rev.reverse();
    let mut legs = prune_interior_transfers(legs_rev, timetable);

    // Destination equal to origin: `label` is itself the origin label and
    // the loop above breaks before pushing anything. Per §8's boundary
    // behavior this is a zero-length journey with arrival = τ₀, not an
    // empty one with no times — represent it with a single degenerate
    // origin leg instead.
    if legs.is_empty() {
        legs.push(Leg {
            from_stop: destination,
            to_stop: destination,
            boarding: Boarding::Origin,
            departure: label.departure,
            arrival: label.arrival,
            fare: 0,
            n_trips: 0,
        });
    }

    Journey { legs }
}
