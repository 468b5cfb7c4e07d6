//! Engine-wide options: transfer defaults, round cap, pruning toggle, and
//! the set of criteria McRAPTOR tracks.

/// Which optional criteria McRAPTOR maintains bags over, beyond arrival time
/// (which is always tracked — a query with no criteria at all is meaningless).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriteriaSet {
    pub fare: bool,
    pub boardings: bool,
}

impl CriteriaSet {
    pub const fn all() -> Self {
        Self {
            fare: true,
            boardings: true,
        }
    }

    pub const fn arrival_time_only() -> Self {
        Self {
            fare: false,
            boardings: false,
        }
    }
}

impl Default for CriteriaSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Options recognized by the search and range-query layers. The index
/// builder takes `default_transfer_seconds` directly through its own
/// `build()` signature rather than through this struct, since building a
/// timetable is a one-time, pre-query step.
#[derive(Debug, Clone)]
pub struct Config {
    pub default_transfer_seconds: i32,
    pub max_rounds: u32,
    pub enable_target_pruning: bool,
    pub criteria: CriteriaSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_transfer_seconds: 120,
            max_rounds: 15,
            enable_target_pruning: true,
            criteria: CriteriaSet::default(),
        }
    }
}
