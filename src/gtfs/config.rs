/// File names of the GTFS tables this adapter reads, relative to the feed
/// root (a directory or the inside of a zip archive). Overridable for
/// feeds that ship the same data under nonstandard names.
#[derive(Debug, Clone)]
pub struct Config {
    pub stops_path: String,
    pub routes_path: String,
    pub trips_path: String,
    pub stop_times_path: String,
    pub transfers_path: String,
    /// Layover applied to every same-station stop pair that `transfers.txt`
    /// doesn't explicitly override, forwarded to the index builder.
    pub default_transfer_seconds: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stops_path: "stops.txt".into(),
            routes_path: "routes.txt".into(),
            trips_path: "trips.txt".into(),
            stop_times_path: "stop_times.txt".into(),
            transfers_path: "transfers.txt".into(),
            default_transfer_seconds: 120,
        }
    }
}
