use std::{collections::HashMap, fs, path::Path, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::state::AppState;

pub async fn age(
    Query(_): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    if state.gtfs_data_path.exists() {
        let last_modified = seconds_since_modified(&state.gtfs_data_path)?;
        Ok(last_modified.to_string().into_response())
    } else {
        Err(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn seconds_since_modified<P: AsRef<Path>>(path: P) -> Result<u64, StatusCode> {
    let meta_data = fs::metadata(path).map_err(|err| {
        error!("Failed to get metadata: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let modified = meta_data.modified().map_err(|err| {
        error!("Failed to get modified: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let duration = modified.elapsed().map_err(|err| {
        error!("Failed to elapsed time since modified: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(duration.as_secs())
}
