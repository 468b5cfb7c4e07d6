mod itinerary;

pub use itinerary::{JourneyDto, LegDto, LegKind, StopDto};
