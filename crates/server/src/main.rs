mod api;
mod dto;
mod state;

use std::{env, path::Path, process, sync::Arc, time::Instant};

use axum::routing::get;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use transiteur::config::Config;
use transiteur::gtfs;

use crate::state::AppState;

const PORT: u32 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let gtfs_data_path = match env::var("GTFS_DATA_PATH") {
        Ok(path_str) => Path::new(&path_str).to_owned(),
        Err(err) => {
            error!("Failed loading GTFS_DATA_PATH: {}", err);
            process::exit(1);
        }
    };
    let app_state = AppState {
        timetable: RwLock::new(None),
        gtfs_data_path,
        config: Config::default(),
    };

    if app_state.gtfs_data_path.exists() {
        info!("Loading GTFS feed...");
        let now = Instant::now();
        match gtfs::load(&app_state.gtfs_data_path, &gtfs::Config::default()) {
            Ok(timetable) => {
                let _ = app_state.timetable.write().await.replace(timetable);
                info!("Loading data took {:?}", now.elapsed());
            }
            Err(err) => {
                error!("Failed to load GTFS feed: {err}");
                process::exit(1);
            }
        }
    } else {
        warn!("No GTFS data found at GTFS_DATA_PATH.");
    }

    info!("Starting server...");

    let app = axum::Router::new()
        .route("/journey", get(api::journey))
        .route("/journey/range", get(api::journey_range))
        .route("/gtfs/age", get(api::age))
        .with_state(Arc::new(app_state));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", PORT))
        .await
        .unwrap();
    info!("Listening to port {PORT}");
    axum::serve(listener, app).await.unwrap();
}
