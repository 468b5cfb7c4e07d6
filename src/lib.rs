//! A round-based public transit journey planner.
//!
//! The core is organized as the dependency chain the RAPTOR family expects:
//! a read-only [`timetable`] built once from raw entities, single-criterion
//! [`raptor`] search, multi-criterion [`mcraptor`] search, shared [`journey`]
//! reconstruction types, and a [`range`] driver that repeats a search across
//! a departure window. [`gtfs`] is a thin ingestion adapter that feeds the
//! timetable builder from a static schedule feed.

pub mod config;
pub mod gtfs;
pub mod journey;
pub mod mcraptor;
pub mod raptor;
pub mod range;
pub mod shared;
pub mod timetable;

pub mod prelude {
    pub use crate::config::{Config, CriteriaSet};
    pub use crate::journey::{Journey, Leg};
    pub use crate::timetable::Timetable;
}
