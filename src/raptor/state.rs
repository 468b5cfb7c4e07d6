use crate::journey::Boarding;
use crate::shared::time::Time;
use crate::timetable::entities::StopIdx;

#[derive(Debug, Clone, Copy)]
pub struct Parent {
    pub from_stop: StopIdx,
    pub boarding: Boarding,
    pub departure: Time,
    pub arrival: Time,
}

/// A candidate improvement produced by a route scan or transfer
/// relaxation, applied to the shared label arrays after the parallel scan
/// completes.
#[derive(Debug, Clone, Copy)]
pub struct Update {
    pub stop: StopIdx,
    pub arrival: Time,
    pub parent: Parent,
}
