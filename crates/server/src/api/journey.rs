use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;
use transiteur::mcraptor;
use transiteur::range::{self, Mode};
use transiteur::raptor;
use transiteur::shared::time::Time;

use crate::dto::JourneyDto;
use crate::state::AppState;

/// `GET /journey?from=<station>&to=<station>&departure=HH:MM:SS[&mode=multi]`
///
/// `mode=multi` runs McRAPTOR and returns every Pareto-optimal journey;
/// otherwise a single earliest-arrival journey is returned.
pub async fn journey(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let Some(timetable) = &*state.timetable.read().await else {
        warn!("no timetable loaded");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let from = params.get("from").ok_or(StatusCode::BAD_REQUEST)?;
    let to = params.get("to").ok_or(StatusCode::BAD_REQUEST)?;
    let departure = params
        .get("departure")
        .and_then(|raw| Time::from_hms(raw.as_str()))
        .ok_or(StatusCode::BAD_REQUEST)?;

    if params.get("mode").map(String::as_str) == Some("multi") {
        let solution = mcraptor::solve_by_station_name(timetable, from, Some(to.as_str()), departure, &state.config)
            .map_err(|_| StatusCode::BAD_REQUEST)?;
        let destination = timetable.station_by_name(to).ok_or(StatusCode::BAD_REQUEST)?;
        let journeys: Vec<JourneyDto> = solution
            .journeys_to_station(timetable, destination.index)
            .iter()
            .map(|journey| JourneyDto::from(timetable, journey))
            .collect();
        Ok(Json(journeys).into_response())
    } else {
        let solution = raptor::solve_by_station_name(timetable, from, Some(to.as_str()), departure, &state.config)
            .map_err(|_| StatusCode::BAD_REQUEST)?;
        let destination = timetable.station_by_name(to).ok_or(StatusCode::BAD_REQUEST)?;
        let journey = solution
            .journey_to_station(timetable, destination.index)
            .ok_or(StatusCode::NOT_FOUND)?;
        Ok(Json(JourneyDto::from(timetable, &journey)).into_response())
    }
}

/// `GET /journey/range?from=<station>&to=<station>&window_start=HH:MM:SS&window_end=HH:MM:SS[&mode=multi]`
///
/// Repeats the search across every candidate departure in the window and
/// returns the Pareto-optimal journeys to `to`.
pub async fn journey_range(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let Some(timetable) = &*state.timetable.read().await else {
        warn!("no timetable loaded");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let from = params.get("from").ok_or(StatusCode::BAD_REQUEST)?;
    let to = params.get("to").ok_or(StatusCode::BAD_REQUEST)?;
    let window_start = params
        .get("window_start")
        .and_then(|raw| Time::from_hms(raw.as_str()))
        .ok_or(StatusCode::BAD_REQUEST)?;
    let window_end = params
        .get("window_end")
        .and_then(|raw| Time::from_hms(raw.as_str()))
        .ok_or(StatusCode::BAD_REQUEST)?;

    let mode = if params.get("mode").map(String::as_str) == Some("multi") {
        Mode::MultiCriteria
    } else {
        Mode::EarliestArrival
    };

    let destination = timetable.station_by_name(to).ok_or(StatusCode::BAD_REQUEST)?;
    let result = range::solve(
        timetable,
        from,
        Some(to.as_str()),
        (window_start, window_end),
        mode,
        &state.config,
    )
    .map_err(|_| StatusCode::BAD_REQUEST)?;

    let journeys: Vec<JourneyDto> = result
        .get(&destination.index)
        .into_iter()
        .flatten()
        .map(|journey| JourneyDto::from(timetable, journey))
        .collect();
    Ok(Json(journeys).into_response())
}
