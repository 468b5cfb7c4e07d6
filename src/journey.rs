//! Shared journey/leg types produced by both RAPTOR and McRAPTOR
//! reconstruction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::time::{Duration, Time};
use crate::timetable::entities::{StopIdx, TripIdx};
use crate::timetable::Timetable;

/// The tagged back-pointer a label or leg carries: an origin has no
/// predecessor, a same-station relaxation is a `Transfer`, and boarding a
/// vehicle names the `Trip` that was boarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boarding {
    Origin,
    Transfer,
    Vehicle(TripIdx),
}

impl Boarding {
    pub fn is_vehicle(&self) -> bool {
        matches!(self, Boarding::Vehicle(_))
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self, Boarding::Transfer)
    }

    pub fn trip(&self) -> Option<TripIdx> {
        match self {
            Boarding::Vehicle(trip) => Some(*trip),
            _ => None,
        }
    }
}

/// One vehicle leg or same-station transfer within a [`Journey`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Leg {
    pub from_stop: StopIdx,
    pub to_stop: StopIdx,
    pub boarding: Boarding,
    pub departure: Time,
    pub arrival: Time,
    pub fare: i32,
    pub n_trips: u32,
}

impl Leg {
    /// True when this leg is a same-station relaxation rather than a
    /// rider-visible vehicle leg.
    pub fn is_same_station_transfer(&self, timetable: &Timetable) -> bool {
        self.boarding.is_transfer()
            && timetable.stop(self.from_stop).station == timetable.stop(self.to_stop).station
    }
}

/// An ordered sequence of legs connecting an origin to a destination with
/// temporal continuity: each leg's arrival station matches the next leg's
/// departure station, and arrival never exceeds the next departure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journey {
    pub legs: Vec<Leg>,
}

/// Drops a same-station transfer leg only when it is the last leg of the
/// journey, per §4.5: RAPTOR/McRAPTOR only ever emit a transfer to bridge
/// into the following round's boarding, so every transfer leg that isn't
/// last is, by construction, the sole means of reaching the vehicle leg
/// right after it — exactly the case §4.5 says to keep as a platform-change
/// marker. A transfer with nothing after it records a walk the rider never
/// needed to use to board anything, so it carries no information the
/// destination stop doesn't already, and is dropped.
pub(crate) fn prune_interior_transfers(mut legs: Vec<Leg>, timetable: &Timetable) -> Vec<Leg> {
    if legs.is_empty() {
        return legs;
    }
    let last = legs.len() - 1;
    let mut keep = vec![true; legs.len()];
    for (i, leg) in legs.iter().enumerate() {
        if i == last && leg.is_same_station_transfer(timetable) {
            keep[i] = false;
        }
    }
    let mut keep = keep.into_iter();
    legs.retain(|_| keep.next().unwrap());
    legs
}

impl Journey {
    pub fn origin(&self) -> Option<StopIdx> {
        self.legs.first().map(|leg| leg.from_stop)
    }

    pub fn destination(&self) -> Option<StopIdx> {
        self.legs.last().map(|leg| leg.to_stop)
    }

    pub fn departure_time(&self) -> Option<Time> {
        self.legs.first().map(|leg| leg.departure)
    }

    pub fn arrival_time(&self) -> Option<Time> {
        self.legs.last().map(|leg| leg.arrival)
    }

    pub fn fare(&self) -> i32 {
        self.legs.last().map(|leg| leg.fare).unwrap_or(0)
    }

    pub fn n_trips(&self) -> u32 {
        self.legs.last().map(|leg| leg.n_trips).unwrap_or(0)
    }

    /// Last leg's arrival minus first leg's departure; `Duration::ZERO` for
    /// an empty (origin-equals-destination) journey.
    pub fn total_travel_time(&self) -> Duration {
        match (self.departure_time(), self.arrival_time()) {
            (Some(departure), Some(arrival)) => arrival - departure,
            _ => Duration::ZERO,
        }
    }

    /// Re-checks the temporal-continuity invariant: consecutive legs share
    /// a station at the join and never require traveling backward in time.
    pub fn is_valid(&self, timetable: &Timetable) -> bool {
        self.legs.windows(2).all(|pair| {
            let (a, b) = (pair[0], pair[1]);
            timetable.stop(a.to_stop).station == timetable.stop(b.from_stop).station
                && a.arrival <= b.departure
        })
    }
}

impl fmt::Display for Journey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.legs.is_empty() {
            return write!(f, "(empty journey)");
        }
        for leg in &self.legs {
            let kind = match leg.boarding {
                Boarding::Origin => "origin".to_string(),
                Boarding::Transfer => "transfer".to_string(),
                Boarding::Vehicle(trip) => format!("trip #{trip}"),
            };
            writeln!(
                f,
                "{} -> {} via {kind}: {} -> {} (fare {}, trips {})",
                leg.from_stop, leg.to_stop, leg.departure, leg.arrival, leg.fare, leg.n_trips
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::timetable::{build, RawStation, RawStop, RawTransfer, RawTrip, RawTripStopTime};

    fn station(id: &str) -> RawStation {
        RawStation {
            id: Arc::from(id),
            name: Arc::from(id),
        }
    }

    fn stop(id: &str, station_id: &str) -> RawStop {
        RawStop {
            id: Arc::from(id),
            name: Arc::from(id),
            station_id: Arc::from(station_id),
            platform_code: None,
        }
    }

    fn vehicle_leg(from: StopIdx, to: StopIdx, trip: TripIdx) -> Leg {
        Leg {
            from_stop: from,
            to_stop: to,
            boarding: Boarding::Vehicle(trip),
            departure: Time::from_seconds(0),
            arrival: Time::from_seconds(0),
            fare: 0,
            n_trips: 1,
        }
    }

    fn transfer_leg(from: StopIdx, to: StopIdx) -> Leg {
        Leg {
            from_stop: from,
            to_stop: to,
            boarding: Boarding::Transfer,
            departure: Time::from_seconds(0),
            arrival: Time::from_seconds(0),
            fare: 0,
            n_trips: 0,
        }
    }

    /// `Ap` and `Cp1`/`Cp2` share no station; `Cp1`/`Cp2` do, so a transfer
    /// between them is same-station while the vehicle legs are not.
    fn three_stop_timetable() -> crate::timetable::Timetable {
        let stations = vec![station("A"), station("C"), station("F")];
        let stops = vec![stop("Ap", "A"), stop("Cp1", "C"), stop("Cp2", "C"), stop("Fp", "F")];
        let trips = vec![
            RawTrip {
                id: Arc::from("T1"),
                short_name: None,
                headsign: None,
                stop_times: vec![
                    RawTripStopTime {
                        stop_id: Arc::from("Ap"),
                        arrival: Time::from_seconds(0),
                        departure: Time::from_seconds(0),
                        boarding_fare: 0,
                    },
                    RawTripStopTime {
                        stop_id: Arc::from("Cp1"),
                        arrival: Time::from_seconds(600),
                        departure: Time::from_seconds(600),
                        boarding_fare: 0,
                    },
                ],
            },
            RawTrip {
                id: Arc::from("T2"),
                short_name: None,
                headsign: None,
                stop_times: vec![
                    RawTripStopTime {
                        stop_id: Arc::from("Cp2"),
                        arrival: Time::from_seconds(660),
                        departure: Time::from_seconds(660),
                        boarding_fare: 0,
                    },
                    RawTripStopTime {
                        stop_id: Arc::from("Fp"),
                        arrival: Time::from_seconds(1500),
                        departure: Time::from_seconds(1500),
                        boarding_fare: 0,
                    },
                ],
            },
        ];
        let transfers = vec![RawTransfer {
            from_stop_id: Arc::from("Cp1"),
            to_stop_id: Arc::from("Cp2"),
            min_transfer_time: crate::shared::time::Duration::from_seconds(60),
        }];
        build(&stations, &stops, &trips, &transfers, 120).unwrap()
    }

    #[test]
    fn interior_transfer_between_two_vehicle_legs_is_kept() {
        let timetable = three_stop_timetable();
        let ap = timetable.station_by_id("A").unwrap().stops[0];
        let cp1 = timetable.station_by_id("C").unwrap().stops[0];
        let cp2 = timetable.station_by_id("C").unwrap().stops[1];
        let fp = timetable.station_by_id("F").unwrap().stops[0];

        let legs = vec![
            vehicle_leg(ap, cp1, 0),
            transfer_leg(cp1, cp2),
            vehicle_leg(cp2, fp, 1),
        ];
        let pruned = prune_interior_transfers(legs, &timetable);

        assert_eq!(pruned.len(), 3);
        assert!(pruned[1].boarding.is_transfer());
        assert_eq!(pruned[1].from_stop, cp1);
        assert_eq!(pruned[1].to_stop, cp2);
    }

    #[test]
    fn trailing_transfer_with_no_following_leg_is_dropped() {
        let timetable = three_stop_timetable();
        let ap = timetable.station_by_id("A").unwrap().stops[0];
        let cp1 = timetable.station_by_id("C").unwrap().stops[0];
        let cp2 = timetable.station_by_id("C").unwrap().stops[1];

        let legs = vec![vehicle_leg(ap, cp1, 0), transfer_leg(cp1, cp2)];
        let pruned = prune_interior_transfers(legs, &timetable);

        assert_eq!(pruned.len(), 1);
        assert!(pruned[0].boarding.is_vehicle());
    }

    #[test]
    fn sole_trailing_transfer_journey_is_emptied() {
        let timetable = three_stop_timetable();
        let cp1 = timetable.station_by_id("C").unwrap().stops[0];
        let cp2 = timetable.station_by_id("C").unwrap().stops[1];

        let legs = vec![transfer_leg(cp1, cp2)];
        let pruned = prune_interior_transfers(legs, &timetable);

        assert!(pruned.is_empty());
    }

    #[test]
    fn leading_same_station_transfer_followed_by_a_vehicle_leg_is_kept() {
        let timetable = three_stop_timetable();
        let cp1 = timetable.station_by_id("C").unwrap().stops[0];
        let cp2 = timetable.station_by_id("C").unwrap().stops[1];
        let fp = timetable.station_by_id("F").unwrap().stops[0];

        let legs = vec![transfer_leg(cp1, cp2), vehicle_leg(cp2, fp, 1)];
        let pruned = prune_interior_transfers(legs, &timetable);

        assert_eq!(pruned.len(), 2);
        assert!(pruned[0].boarding.is_transfer());
    }
}
