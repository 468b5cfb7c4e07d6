use serde::Serialize;
use transiteur::journey::{Boarding, Journey, Leg};
use transiteur::shared::time::Time;
use transiteur::timetable::Timetable;

#[derive(Debug, Clone, Serialize)]
pub struct StopDto {
    pub id: String,
    pub name: String,
    pub platform_code: Option<String>,
}

impl StopDto {
    fn from(timetable: &Timetable, stop: u32) -> Self {
        let stop = timetable.stop(stop);
        Self {
            id: stop.id.to_string(),
            name: stop.name.to_string(),
            platform_code: stop.platform_code.as_ref().map(|code| code.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    Origin,
    Transfer,
    Vehicle,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegDto {
    pub from: StopDto,
    pub to: StopDto,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub kind: LegKind,
    pub trip_short_name: Option<String>,
    pub trip_headsign: Option<String>,
    pub fare: i32,
    pub n_trips: u32,
}

impl LegDto {
    fn from(timetable: &Timetable, leg: &Leg) -> Self {
        let (kind, trip_short_name, trip_headsign) = match leg.boarding {
            Boarding::Origin => (LegKind::Origin, None, None),
            Boarding::Transfer => (LegKind::Transfer, None, None),
            Boarding::Vehicle(trip) => {
                let trip = timetable.trip(trip);
                (
                    LegKind::Vehicle,
                    trip.short_name.as_ref().map(|name| name.to_string()),
                    trip.headsign.as_ref().map(|sign| sign.to_string()),
                )
            }
        };

        Self {
            from: StopDto::from(timetable, leg.from_stop),
            to: StopDto::from(timetable, leg.to_stop),
            departure_time: leg.departure,
            arrival_time: leg.arrival,
            kind,
            trip_short_name,
            trip_headsign,
            fare: leg.fare,
            n_trips: leg.n_trips,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JourneyDto {
    pub departure_time: Option<Time>,
    pub arrival_time: Option<Time>,
    pub fare: i32,
    pub n_trips: u32,
    pub legs: Vec<LegDto>,
}

impl JourneyDto {
    pub fn from(timetable: &Timetable, journey: &Journey) -> Self {
        Self {
            departure_time: journey.departure_time(),
            arrival_time: journey.arrival_time(),
            fare: journey.fare(),
            n_trips: journey.n_trips(),
            legs: journey.legs.iter().map(|leg| LegDto::from(timetable, leg)).collect(),
        }
    }
}
