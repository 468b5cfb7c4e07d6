//! A minimal streaming GTFS reader. It loads exactly the tables the
//! timetable builder (§4.2) needs — `stops.txt`, `routes.txt`, `trips.txt`,
//! `stop_times.txt`, `transfers.txt` — from either a directory of `.txt`
//! files or a `.zip` archive, and nothing else: no `shapes.txt`,
//! `calendar.txt`, `fare_attributes.txt`, or `agency.txt`.

mod config;
pub mod loader;
pub mod models;

pub use config::*;
pub use loader::{load, LoadError};
use models::*;
use serde::de::DeserializeOwned;
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::info;
use zip::{read::ZipFile, ZipArchive};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not find file with name: {0}")]
    FileNotFound(String),
    #[error("no source to pull data from (call from_zip/from_directory first)")]
    MissingSource,
}

#[derive(Default)]
pub enum Source {
    #[default]
    None,
    Zip(ZipArchive<File>),
    Directory(PathBuf),
}

/// A handle on a GTFS feed, either a directory or a zip archive, that
/// streams rows of one table at a time rather than materializing the
/// whole feed in memory.
#[derive(Default)]
pub struct Gtfs {
    config: Config,
    storage: Source,
}

impl Gtfs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn from_zip<P: AsRef<Path>>(mut self, path: P) -> Result<Self, Error> {
        let zip_file = File::open(path)?;
        let archive = ZipArchive::new(zip_file)?;
        self.storage = Source::Zip(archive);
        Ok(self)
    }

    pub fn from_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage = Source::Directory(path.as_ref().to_path_buf());
        self
    }

    /// Opens `path` directly as a directory if it is one, extracting it to
    /// a sibling cache directory first if it's a zip archive (extracted
    /// once; subsequent calls reuse the cache directory if present).
    pub fn from_path_cached<P: AsRef<Path>>(mut self, path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if path.is_dir() {
            self.storage = Source::Directory(path.to_path_buf());
            return Ok(self);
        }

        let mut cache_dir = path.to_path_buf();
        cache_dir.set_extension("");
        if !cache_dir.exists() {
            info!(target = ?cache_dir, "extracting GTFS feed to cache directory");
            fs::create_dir_all(&cache_dir)?;
            let file = File::open(path)?;
            let mut archive = ZipArchive::new(file)?;
            archive.extract(&cache_dir)?;
        } else {
            info!(target = ?cache_dir, "using existing GTFS cache directory");
        }
        self.storage = Source::Directory(cache_dir);
        Ok(self)
    }

    pub fn stream_stops<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnMut(GtfsStop),
    {
        self.stream(&self.config.stops_path.clone(), f)
    }

    pub fn stream_routes<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnMut(GtfsRoute),
    {
        self.stream(&self.config.routes_path.clone(), f)
    }

    pub fn stream_trips<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnMut(GtfsTrip),
    {
        self.stream(&self.config.trips_path.clone(), f)
    }

    pub fn stream_stop_times<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnMut(GtfsStopTime),
    {
        self.stream(&self.config.stop_times_path.clone(), f)
    }

    pub fn stream_transfers<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnMut(GtfsTransfer),
    {
        self.stream(&self.config.transfers_path.clone(), f)
    }

    fn stream<T, F>(&mut self, file_name: &str, f: F) -> Result<(), Error>
    where
        T: DeserializeOwned,
        F: FnMut(T),
    {
        match &mut self.storage {
            Source::None => Err(Error::MissingSource),
            Source::Zip(archive) => stream_from_zip(archive, file_name, f),
            Source::Directory(path) => stream_from_dir(path, file_name, f),
        }
    }
}

fn stream_from_zip<T, F>(archive: &mut ZipArchive<File>, file_name: &str, mut f: F) -> Result<(), Error>
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    let file = get_file_from_zip(archive, file_name)?;
    let mut reader = csv::Reader::from_reader(file);
    for result in reader.deserialize() {
        let record: T = result?;
        f(record);
    }
    Ok(())
}

fn stream_from_dir<T, F>(dir_path: &Path, file_name: &str, mut f: F) -> Result<(), Error>
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    let file_path = dir_path.join(file_name);
    let file = fs::File::open(file_path)?;
    // BufReader is critical here for speed.
    let reader = io::BufReader::with_capacity(128 * 1024, file);
    let mut csv_reader = csv::Reader::from_reader(reader);
    for result in csv_reader.deserialize() {
        let record: T = result?;
        f(record);
    }
    Ok(())
}

fn get_file_from_zip<'a>(archive: &'a mut ZipArchive<File>, name: &'a str) -> Result<ZipFile<'a, File>, Error> {
    let index = archive
        .index_for_name(name)
        .ok_or_else(|| Error::FileNotFound(name.to_string()))?;
    Ok(archive.by_index(index)?)
}
