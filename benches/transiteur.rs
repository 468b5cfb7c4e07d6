//! Manual performance tracking for RAPTOR/McRAPTOR over a synthetic,
//! larger-than-unit-test timetable. Not part of the correctness suite —
//! `tests/` owns that — this only exercises the hot loops (route
//! traversal, transfer relaxation, Pareto merge) at a scale close to a
//! real single-city feed.

use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use criterion::{criterion_group, criterion_main, Criterion};

use transiteur::config::Config;
use transiteur::mcraptor;
use transiteur::range::{self, Mode};
use transiteur::raptor;
use transiteur::shared::time::Time;
use transiteur::timetable::{
    build, RawStation, RawStop, RawTrip, RawTripStopTime, Timetable,
};

const STATIONS: usize = 300;
const HOP_SECONDS: i32 = 120;
const LOCAL_HEADWAY: i32 = 300;
const EXPRESS_STRIDE: usize = 10;
const EXPRESS_FARE: i32 = 500;
const SERVICE_SECONDS: i32 = 18 * 3600;

/// A single trunk line calling at every station plus a skip-stop express
/// line over every tenth station, charging a flat surcharge. The two
/// share stations directly (no separate platforms), so boarding either
/// one is a same-stop route choice rather than a transfer — enough to
/// produce real arrival/fare/boardings trade-offs for McRAPTOR without
/// needing a second dimension of geography.
fn build_network() -> Timetable {
    let mut raw_stations = Vec::with_capacity(STATIONS);
    let mut raw_stops = Vec::with_capacity(STATIONS);
    for i in 0..STATIONS {
        let id: Arc<str> = Arc::from(format!("S{i}"));
        raw_stations.push(RawStation {
            id: id.clone(),
            name: id.clone(),
        });
        raw_stops.push(RawStop {
            id: id.clone(),
            name: id.clone(),
            station_id: id,
            platform_code: None,
        });
    }

    let mut raw_trips = Vec::new();

    let mut departure = 0;
    let mut trip_no = 0;
    while departure + (STATIONS as i32 - 1) * HOP_SECONDS <= SERVICE_SECONDS {
        let mut stop_times = Vec::with_capacity(STATIONS);
        let mut t = departure;
        for i in 0..STATIONS {
            stop_times.push(RawTripStopTime {
                stop_id: Arc::from(format!("S{i}").as_str()),
                arrival: Time::from_seconds(t),
                departure: Time::from_seconds(t + 30),
                boarding_fare: 0,
            });
            t += HOP_SECONDS;
        }
        raw_trips.push(RawTrip {
            id: Arc::from(format!("local-{trip_no}").as_str()),
            short_name: Some(Arc::from("L1")),
            headsign: None,
            stop_times,
        });
        departure += LOCAL_HEADWAY;
        trip_no += 1;
    }

    let express_stops: Vec<usize> = (0..STATIONS).step_by(EXPRESS_STRIDE).collect();
    let express_hop = HOP_SECONDS / 3;
    let express_headway = LOCAL_HEADWAY * 3;
    let mut departure = 60;
    let mut trip_no = 0;
    while departure + (express_stops.len() as i32 - 1) * express_hop <= SERVICE_SECONDS {
        let mut stop_times = Vec::with_capacity(express_stops.len());
        let mut t = departure;
        for &stop in &express_stops {
            stop_times.push(RawTripStopTime {
                stop_id: Arc::from(format!("S{stop}").as_str()),
                arrival: Time::from_seconds(t),
                departure: Time::from_seconds(t + 30),
                boarding_fare: EXPRESS_FARE,
            });
            t += express_hop;
        }
        raw_trips.push(RawTrip {
            id: Arc::from(format!("express-{trip_no}").as_str()),
            short_name: Some(Arc::from("X1")),
            headsign: None,
            stop_times,
        });
        departure += express_headway;
        trip_no += 1;
    }

    build(&raw_stations, &raw_stops, &raw_trips, &[], 120).expect("synthetic network builds")
}

fn raptor_short_hop(timetable: &Timetable, config: &Config) {
    let origins = [0u32];
    let _ = black_box(raptor::solve(timetable, &origins, Time::from_seconds(28_800), config));
}

fn raptor_cross_network(timetable: &Timetable, config: &Config) {
    let origins = [0u32];
    let _ = black_box(raptor::solve(timetable, &origins, Time::from_seconds(28_800), config));
}

fn mcraptor_cross_network(timetable: &Timetable, config: &Config) {
    let origins = [0u32];
    let _ = black_box(mcraptor::solve(timetable, &origins, Time::from_seconds(28_800), config));
}

fn range_query(timetable: &Timetable, config: &Config) {
    let window = (Time::from_seconds(28_800), Time::from_seconds(30_600));
    let _ = black_box(range::solve(
        timetable,
        "S0",
        Some("S290"),
        window,
        Mode::MultiCriteria,
        config,
    ));
}

fn criterion_benchmark(c: &mut Criterion) {
    let timetable = build_network();
    let config = Config::default();

    let mut group = c.benchmark_group("routing");
    group.warm_up_time(StdDuration::from_secs(3));
    group.measurement_time(StdDuration::from_secs(10));

    group.bench_function("raptor short hop", |b| b.iter(|| raptor_short_hop(&timetable, &config)));
    group.bench_function("raptor cross-network", |b| {
        b.iter(|| raptor_cross_network(&timetable, &config))
    });
    group.bench_function("mcraptor cross-network", |b| {
        b.iter(|| mcraptor_cross_network(&timetable, &config))
    });
    group.bench_function("range query", |b| b.iter(|| range_query(&timetable, &config)));

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
