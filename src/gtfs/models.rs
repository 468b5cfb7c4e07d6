//! One row struct per GTFS table this adapter streams. Deliberately thin:
//! only the columns the timetable builder needs are kept, and tables the
//! core doesn't use (`shapes.txt`, `calendar.txt`, `fare_attributes.txt`,
//! `agency.txt` beyond an opaque id) are not modeled at all.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GtfsStop {
    pub stop_id: String,
    pub stop_name: String,
    #[serde(default)]
    pub parent_station: Option<String>,
    #[serde(default)]
    pub platform_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GtfsRoute {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub route_long_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GtfsTrip {
    pub route_id: String,
    pub trip_id: String,
    #[serde(default)]
    pub trip_headsign: Option<String>,
    #[serde(default)]
    pub trip_short_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GtfsStopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: u16,
    /// Non-standard column some feeds carry for a flat per-boarding fare
    /// addition, in the smallest currency unit. Absent in plain GTFS.
    #[serde(default)]
    pub fare_units: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GtfsTransfer {
    pub from_stop_id: String,
    pub to_stop_id: String,
    #[serde(default)]
    pub min_transfer_time: Option<i32>,
}
