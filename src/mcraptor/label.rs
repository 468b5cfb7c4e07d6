use std::sync::Arc;

use crate::config::CriteriaSet;
use crate::journey::Boarding;
use crate::shared::time::Time;
use crate::timetable::entities::StopIdx;

/// One multi-criteria label in a McRAPTOR bag. `arrival`/`fare`/`n_trips`
/// are the criteria vector of §4.4; `boarding`/`from_stop`/`departure`
/// describe the leg that produced this label, and `predecessor` is an
/// immutable link to the label it was extended from — a persistent chain
/// that makes reconstruction a direct walk rather than a bag re-scan.
/// `predecessor` is `None` only for an origin label.
#[derive(Debug, Clone)]
pub struct Label {
    pub arrival: Time,
    pub fare: i32,
    pub n_trips: u32,
    pub boarding: Boarding,
    pub from_stop: StopIdx,
    pub departure: Time,
    pub predecessor: Option<Arc<Label>>,
}

impl Label {
    pub fn origin(stop: StopIdx, departure: Time) -> Self {
        Self {
            arrival: departure,
            fare: 0,
            n_trips: 0,
            boarding: Boarding::Origin,
            from_stop: stop,
            departure,
            predecessor: None,
        }
    }

    /// Componentwise `<=` over the criteria `criteria` selects, with at
    /// least one strict `<` — the dominance relation of §4.4.
    pub fn dominates(&self, other: &Label, criteria: CriteriaSet) -> bool {
        let mut strictly_better = false;

        if self.arrival > other.arrival {
            return false;
        }
        if self.arrival < other.arrival {
            strictly_better = true;
        }

        if criteria.fare {
            if self.fare > other.fare {
                return false;
            }
            if self.fare < other.fare {
                strictly_better = true;
            }
        }

        if criteria.boardings {
            if self.n_trips > other.n_trips {
                return false;
            }
            if self.n_trips < other.n_trips {
                strictly_better = true;
            }
        }

        strictly_better
    }

    /// True when `self` and `other` tie on every active criterion —
    /// neither dominates the other, but they're not worth keeping as
    /// distinct alternatives unless the caller asked to `keep_equal`.
    pub fn ties_with(&self, other: &Label, criteria: CriteriaSet) -> bool {
        self.arrival == other.arrival
            && (!criteria.fare || self.fare == other.fare)
            && (!criteria.boardings || self.n_trips == other.n_trips)
    }
}
