//! Black-box scenario tests over small synthetic timetables, built
//! directly against the public API — no GTFS feed involved.

use std::sync::Arc;

use transiteur::config::Config;
use transiteur::journey::Boarding;
use transiteur::mcraptor;
use transiteur::range::{self, Mode};
use transiteur::raptor;
use transiteur::shared::time::Time;
use transiteur::timetable::{
    build, RawStation, RawStop, RawTrip, RawTripStopTime, RawTransfer, Timetable,
};

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

fn stop_time(stop_id: &str, hms: &str, fare: i32) -> RawTripStopTime {
    let t = Time::from_hms(hms).unwrap();
    RawTripStopTime {
        stop_id: Arc::from(stop_id),
        arrival: t,
        departure: t,
        boarding_fare: fare,
    }
}

fn trip(id: &str, stop_times: Vec<RawTripStopTime>) -> RawTrip {
    RawTrip {
        id: Arc::from(id),
        short_name: None,
        headsign: None,
        stop_times,
    }
}

fn stop_of(timetable: &Timetable, station_id: &str) -> u32 {
    timetable.station_by_id(station_id).unwrap().stops[0]
}

/// Scenario A — direct connection.
#[test]
fn direct_connection() {
    let stations = vec![station("A"), station("B")];
    let stops = vec![stop("Ap", "A"), stop("Bp", "B")];
    let trips = vec![trip(
        "T1",
        vec![stop_time("Ap", "08:00:00", 0), stop_time("Bp", "08:30:00", 0)],
    )];
    let timetable = build(&stations, &stops, &trips, &[], 120).unwrap();

    let origin = stop_of(&timetable, "A");
    let destination = stop_of(&timetable, "B");
    let config = Config {
        max_rounds: 1,
        ..Default::default()
    };

    let solution = raptor::solve(&timetable, &[origin], Time::from_hms("07:55:00").unwrap(), &config).unwrap();
    let journey = solution.journey_to(&timetable, destination).unwrap();

    assert_eq!(journey.legs.len(), 1);
    let leg = journey.legs[0];
    assert_eq!(leg.from_stop, origin);
    assert_eq!(leg.to_stop, destination);
    assert!(matches!(leg.boarding, Boarding::Vehicle(_)));
    assert_eq!(leg.departure, Time::from_hms("08:00:00").unwrap());
    assert_eq!(leg.arrival, Time::from_hms("08:30:00").unwrap());
    assert_eq!(leg.fare, 0);
    assert_eq!(leg.n_trips, 1);
}

fn build_one_transfer_network(layover_seconds: i32, second_r2_trip: Option<&str>) -> Timetable {
    let stations = vec![station("A"), station("C"), station("F")];
    let stops = vec![stop("Ap", "A"), stop("Cp1", "C"), stop("Cp2", "C"), stop("Fp", "F")];

    let mut trips = vec![
        trip("T1", vec![stop_time("Ap", "08:00:00", 0), stop_time("Cp1", "08:10:00", 0)]),
        trip("T2", vec![stop_time("Cp2", "08:11:00", 0), stop_time("Fp", "08:25:00", 0)]),
    ];
    if let Some(id) = second_r2_trip {
        trips.push(trip(
            id,
            vec![stop_time("Cp2", "08:12:30", 0), stop_time("Fp", "08:26:30", 0)],
        ));
    }

    let transfers = vec![RawTransfer {
        from_stop_id: Arc::from("Cp1"),
        to_stop_id: Arc::from("Cp2"),
        min_transfer_time: transiteur::shared::time::Duration::from_seconds(layover_seconds),
    }];

    build(&stations, &stops, &trips, &transfers, 120).unwrap()
}

/// Scenario B — one transfer, 60 s layover: the direct follow-on trip is
/// caught.
#[test]
fn one_transfer_short_layover() {
    let timetable = build_one_transfer_network(60, None);
    let origin = stop_of(&timetable, "A");
    let destination = stop_of(&timetable, "F");
    let config = Config {
        max_rounds: 2,
        ..Default::default()
    };

    let solution = raptor::solve(&timetable, &[origin], Time::from_hms("08:00:00").unwrap(), &config).unwrap();
    let journey = solution.journey_to(&timetable, destination).unwrap();

    assert_eq!(journey.arrival_time().unwrap(), Time::from_hms("08:25:00").unwrap());
    assert_eq!(journey.n_trips(), 2);
}

/// Scenario B — one transfer, 120 s layover: the direct follow-on trip is
/// missed, so the next trip on the second route is used instead.
#[test]
fn one_transfer_long_layover_misses_first_connection() {
    let timetable = build_one_transfer_network(120, Some("T2b"));
    let origin = stop_of(&timetable, "A");
    let destination = stop_of(&timetable, "F");
    let config = Config {
        max_rounds: 2,
        ..Default::default()
    };

    let solution = raptor::solve(&timetable, &[origin], Time::from_hms("08:00:00").unwrap(), &config).unwrap();
    let journey = solution.journey_to(&timetable, destination).unwrap();

    assert_eq!(journey.arrival_time().unwrap(), Time::from_hms("08:26:30").unwrap());
}

/// Scenario C — Pareto trade-off: McRAPTOR keeps both the faster,
/// pricier direct trip and the slower, cheaper two-leg trip; RAPTOR only
/// keeps the faster one.
#[test]
fn pareto_trade_off() {
    let stations = vec![station("A"), station("M"), station("F")];
    let stops = vec![
        stop("Ap", "A"),
        stop("Mp1", "M"),
        stop("Mp2", "M"),
        stop("Fp", "F"),
    ];
    let trips = vec![
        trip("Ty", vec![stop_time("Ap", "08:00:00", 7), stop_time("Fp", "08:55:00", 0)]),
        trip("Tx1", vec![stop_time("Ap", "08:05:00", 0), stop_time("Mp1", "08:30:00", 0)]),
        trip("Tx2", vec![stop_time("Mp2", "08:31:00", 0), stop_time("Fp", "09:00:00", 0)]),
    ];
    let transfers = vec![RawTransfer {
        from_stop_id: Arc::from("Mp1"),
        to_stop_id: Arc::from("Mp2"),
        min_transfer_time: transiteur::shared::time::Duration::from_seconds(60),
    }];
    let timetable = build(&stations, &stops, &trips, &transfers, 120).unwrap();

    let origin = stop_of(&timetable, "A");
    let destination_station = timetable.station_by_id("F").unwrap().index;
    let config = Config {
        max_rounds: 2,
        ..Default::default()
    };

    let mc_solution = mcraptor::solve(&timetable, &[origin], Time::from_hms("08:00:00").unwrap(), &config).unwrap();
    let mut journeys = mc_solution.journeys_to_station(&timetable, destination_station);
    journeys.sort_by_key(|j| j.arrival_time());
    assert_eq!(journeys.len(), 2);
    assert_eq!(journeys[0].arrival_time().unwrap(), Time::from_hms("08:55:00").unwrap());
    assert_eq!(journeys[0].fare(), 7);
    assert_eq!(journeys[0].n_trips(), 1);
    assert_eq!(journeys[1].arrival_time().unwrap(), Time::from_hms("09:00:00").unwrap());
    assert_eq!(journeys[1].fare(), 0);
    assert_eq!(journeys[1].n_trips(), 2);

    let raptor_solution = raptor::solve(&timetable, &[origin], Time::from_hms("08:00:00").unwrap(), &config).unwrap();
    let fastest = raptor_solution.journey_to_station(&timetable, destination_station).unwrap();
    assert_eq!(fastest.arrival_time().unwrap(), Time::from_hms("08:55:00").unwrap());
}

/// Scenario D — overtaking must be rejected at build time.
#[test]
fn overtaking_rejected() {
    let stations = vec![station("A"), station("B")];
    let stops = vec![stop("Ap", "A"), stop("Bp", "B")];
    let trips = vec![
        trip("T1", vec![stop_time("Ap", "08:00:00", 0), stop_time("Bp", "09:00:00", 0)]),
        trip("T2", vec![stop_time("Ap", "08:05:00", 0), stop_time("Bp", "08:50:00", 0)]),
    ];

    let result = build(&stations, &stops, &trips, &[], 120);
    assert!(matches!(
        result,
        Err(transiteur::timetable::BuildError::Overtaking { .. })
    ));
}

/// Scenario E — range query: every departure in the window contributes a
/// journey whose departure time matches an actual stop-time of a trip
/// serving the origin.
#[test]
fn range_query_over_window() {
    let stations = vec![station("A"), station("F")];
    let stops = vec![stop("Ap", "A"), stop("Fp", "F")];
    let trips = vec![
        trip("T1", vec![stop_time("Ap", "08:00:00", 0), stop_time("Fp", "08:30:00", 0)]),
        trip("T2", vec![stop_time("Ap", "08:15:00", 0), stop_time("Fp", "08:45:00", 0)]),
        trip("T3", vec![stop_time("Ap", "08:30:00", 0), stop_time("Fp", "09:00:00", 0)]),
    ];
    let timetable = build(&stations, &stops, &trips, &[], 120).unwrap();
    let config = Config::default();

    let result = range::solve(
        &timetable,
        "A",
        Some("F"),
        (Time::from_hms("08:00:00").unwrap(), Time::from_hms("08:30:00").unwrap()),
        Mode::EarliestArrival,
        &config,
    )
    .unwrap();

    let destination = timetable.station_by_id("F").unwrap().index;
    let journeys = result.get(&destination).expect("destination reachable");
    assert_eq!(journeys.len(), 3);

    let known_departures: Vec<Time> = vec!["08:00:00", "08:15:00", "08:30:00"]
        .into_iter()
        .map(|hms| Time::from_hms(hms).unwrap())
        .collect();
    for journey in journeys {
        assert!(known_departures.contains(&journey.departure_time().unwrap()));
    }
}

/// Scenario F — unreachable destination.
#[test]
fn unreachable_destination() {
    let stations = vec![station("A"), station("B"), station("Z")];
    let stops = vec![stop("Ap", "A"), stop("Bp", "B"), stop("Zp", "Z")];
    let trips = vec![trip(
        "T1",
        vec![stop_time("Ap", "08:00:00", 0), stop_time("Bp", "08:30:00", 0)],
    )];
    let timetable = build(&stations, &stops, &trips, &[], 120).unwrap();

    let origin = stop_of(&timetable, "A");
    let unreachable = stop_of(&timetable, "Z");
    let config = Config::default();

    let raptor_solution = raptor::solve(&timetable, &[origin], Time::from_hms("08:00:00").unwrap(), &config).unwrap();
    assert!(raptor_solution.journey_to(&timetable, unreachable).is_none());

    let mc_solution = mcraptor::solve(&timetable, &[origin], Time::from_hms("08:00:00").unwrap(), &config).unwrap();
    assert!(mc_solution.journeys_to(&timetable, unreachable).is_empty());
}

/// Boundary behavior: a destination equal to the origin is a zero-length
/// journey whose arrival equals τ₀, not an empty "unreached" result.
#[test]
fn destination_equal_to_origin_is_a_zero_length_journey() {
    let stations = vec![station("A"), station("B")];
    let stops = vec![stop("Ap", "A"), stop("Bp", "B")];
    let trips = vec![trip(
        "T1",
        vec![stop_time("Ap", "08:00:00", 0), stop_time("Bp", "08:30:00", 0)],
    )];
    let timetable = build(&stations, &stops, &trips, &[], 120).unwrap();

    let origin = stop_of(&timetable, "A");
    let departure = Time::from_hms("07:55:00").unwrap();
    let config = Config::default();

    let raptor_solution = raptor::solve(&timetable, &[origin], departure, &config).unwrap();
    let journey = raptor_solution.journey_to(&timetable, origin).unwrap();
    assert!(journey.legs.is_empty() || journey.legs.len() == 1);
    assert_eq!(journey.arrival_time(), Some(departure));
    assert_eq!(journey.departure_time(), Some(departure));
    assert_eq!(journey.n_trips(), 0);

    let mc_solution = mcraptor::solve(&timetable, &[origin], departure, &config).unwrap();
    let journeys = mc_solution.journeys_to(&timetable, origin);
    assert!(journeys.iter().any(|j| j.arrival_time() == Some(departure)));
}

/// Boundary behavior: `K = 0` is a valid, non-error query — it returns only
/// the origin itself; any other destination is unreachable within zero
/// rounds.
#[test]
fn zero_rounds_reaches_only_the_origin() {
    let stations = vec![station("A"), station("B")];
    let stops = vec![stop("Ap", "A"), stop("Bp", "B")];
    let trips = vec![trip(
        "T1",
        vec![stop_time("Ap", "08:00:00", 0), stop_time("Bp", "08:30:00", 0)],
    )];
    let timetable = build(&stations, &stops, &trips, &[], 120).unwrap();

    let origin = stop_of(&timetable, "A");
    let destination = stop_of(&timetable, "B");
    let departure = Time::from_hms("08:00:00").unwrap();
    let config = Config {
        max_rounds: 0,
        ..Default::default()
    };

    let raptor_solution = raptor::solve(&timetable, &[origin], departure, &config).unwrap();
    assert_eq!(raptor_solution.journey_to(&timetable, origin).unwrap().arrival_time(), Some(departure));
    assert!(raptor_solution.journey_to(&timetable, destination).is_none());

    let mc_solution = mcraptor::solve(&timetable, &[origin], departure, &config).unwrap();
    assert!(mc_solution.journeys_to(&timetable, destination).is_empty());
}
