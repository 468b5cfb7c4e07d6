use std::path::PathBuf;

use tokio::sync::RwLock;
use transiteur::config::Config;
use transiteur::timetable::Timetable;

pub struct AppState {
    pub gtfs_data_path: PathBuf,
    pub timetable: RwLock<Option<Timetable>>,
    pub config: Config,
}
