mod gtfs;
mod journey;

pub use gtfs::age;
pub use journey::{journey, journey_range};
