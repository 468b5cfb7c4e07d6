//! The single entry point this adapter exposes: stream every table the
//! core model needs and hand the assembled raw entities to
//! [`crate::timetable::build`].

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::shared::time::{Duration, Time};
use crate::timetable::{
    build, BuildError, RawStation, RawStop, RawTransfer, RawTrip, RawTripStopTime, Timetable,
};

use super::models::{GtfsRoute, GtfsStop, GtfsStopTime, GtfsTransfer, GtfsTrip};
use super::{Config, Gtfs};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Gtfs(#[from] super::Error),
    #[error("stop_times.txt references unknown stop {0}")]
    UnknownStop(String),
    #[error("trips.txt references unknown route {0}")]
    UnknownRoute(String),
    #[error("malformed time {raw:?} for trip {trip_id}")]
    MalformedTime { trip_id: String, raw: String },
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Streams a GTFS feed — a directory of `.txt` files, or a `.zip` archive
/// (detected by extension) — and builds a [`Timetable`] from it.
pub fn load(path: impl AsRef<Path>, config: &Config) -> Result<Timetable, LoadError> {
    let path = path.as_ref();
    let mut gtfs = Gtfs::new().with_config(config.clone());
    gtfs = if path.extension().and_then(|ext| ext.to_str()) == Some("zip") {
        gtfs.from_zip(path)?
    } else {
        gtfs.from_directory(path)
    };

    let mut stops: Vec<GtfsStop> = Vec::new();
    gtfs.stream_stops(|row| stops.push(row))?;

    let mut route_ids: HashSet<String> = HashSet::new();
    gtfs.stream_routes(|row: GtfsRoute| {
        route_ids.insert(row.route_id);
    })?;

    let mut trips: Vec<GtfsTrip> = Vec::new();
    gtfs.stream_trips(|row| trips.push(row))?;

    let mut stop_times_by_trip: HashMap<String, Vec<GtfsStopTime>> = HashMap::new();
    gtfs.stream_stop_times(|row: GtfsStopTime| {
        stop_times_by_trip.entry(row.trip_id.clone()).or_default().push(row);
    })?;

    let mut raw_gtfs_transfers: Vec<GtfsTransfer> = Vec::new();
    gtfs.stream_transfers(|row| raw_gtfs_transfers.push(row))?;

    info!(stops = stops.len(), trips = trips.len(), "gtfs feed streamed");

    // A stop's station is its `parent_station`, or itself when standalone
    // (plain GTFS allows a platform with no parent at all).
    let station_id_of = |stop: &GtfsStop| -> String {
        stop.parent_station.clone().unwrap_or_else(|| stop.stop_id.clone())
    };

    let mut station_name: HashMap<String, String> = HashMap::new();
    for stop in &stops {
        station_name
            .entry(stop.stop_id.clone())
            .or_insert_with(|| stop.stop_name.clone());
    }

    let mut station_ids: Vec<String> = Vec::new();
    let mut seen_stations: HashSet<String> = HashSet::new();
    for stop in &stops {
        let station_id = station_id_of(stop);
        if seen_stations.insert(station_id.clone()) {
            station_ids.push(station_id);
        }
    }

    let raw_stations: Vec<RawStation> = station_ids
        .iter()
        .map(|id| RawStation {
            id: Arc::from(id.as_str()),
            name: Arc::from(station_name.get(id).map(String::as_str).unwrap_or(id.as_str())),
        })
        .collect();

    let raw_stops: Vec<RawStop> = stops
        .iter()
        .map(|stop| RawStop {
            id: Arc::from(stop.stop_id.as_str()),
            name: Arc::from(stop.stop_name.as_str()),
            station_id: Arc::from(station_id_of(stop).as_str()),
            platform_code: stop.platform_code.as_deref().map(Arc::from),
        })
        .collect();

    let known_stops: HashSet<&str> = stops.iter().map(|s| s.stop_id.as_str()).collect();

    let mut raw_trips = Vec::with_capacity(trips.len());
    for trip in &trips {
        if !route_ids.contains(&trip.route_id) {
            return Err(LoadError::UnknownRoute(trip.route_id.clone()));
        }
        let Some(mut stop_times) = stop_times_by_trip.remove(&trip.trip_id) else {
            continue; // a trip with no stop_times rows carries no schedule
        };
        stop_times.sort_by_key(|st| st.stop_sequence);

        let mut raw_stop_times = Vec::with_capacity(stop_times.len());
        for st in &stop_times {
            if !known_stops.contains(st.stop_id.as_str()) {
                return Err(LoadError::UnknownStop(st.stop_id.clone()));
            }
            let arrival = Time::from_hms(&st.arrival_time).ok_or_else(|| LoadError::MalformedTime {
                trip_id: trip.trip_id.clone(),
                raw: st.arrival_time.clone(),
            })?;
            let departure = Time::from_hms(&st.departure_time).ok_or_else(|| LoadError::MalformedTime {
                trip_id: trip.trip_id.clone(),
                raw: st.departure_time.clone(),
            })?;
            raw_stop_times.push(RawTripStopTime {
                stop_id: Arc::from(st.stop_id.as_str()),
                arrival,
                departure,
                boarding_fare: st.fare_units.unwrap_or(0),
            });
        }

        raw_trips.push(RawTrip {
            id: Arc::from(trip.trip_id.as_str()),
            short_name: trip.trip_short_name.as_deref().map(Arc::from),
            headsign: trip.trip_headsign.as_deref().map(Arc::from),
            stop_times: raw_stop_times,
        });
    }

    let raw_transfers: Vec<RawTransfer> = raw_gtfs_transfers
        .iter()
        .map(|t| RawTransfer {
            from_stop_id: Arc::from(t.from_stop_id.as_str()),
            to_stop_id: Arc::from(t.to_stop_id.as_str()),
            min_transfer_time: Duration::from_seconds(
                t.min_transfer_time.unwrap_or(config.default_transfer_seconds),
            ),
        })
        .collect();

    Ok(build(
        &raw_stations,
        &raw_stops,
        &raw_trips,
        &raw_transfers,
        config.default_transfer_seconds,
    )?)
}
