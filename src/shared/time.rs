use std::{
    fmt,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

/// A point in time expressed as seconds since the start of the service day.
///
/// Backed by `i32` per the engine's numeric contract: the valid domain is
/// `[0, i32::MAX)` and `Time::INFINITY` (`i32::MAX`) is the sentinel for
/// "unreached".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time(i32);

impl Time {
    /// Sentinel value denoting a stop that has not yet been reached.
    pub const INFINITY: Time = Time(i32::MAX);

    pub const fn from_seconds(secs: i32) -> Self {
        Self(secs)
    }

    pub const fn as_seconds(&self) -> i32 {
        self.0
    }

    pub const fn is_infinite(&self) -> bool {
        self.0 == i32::MAX
    }

    pub fn to_hms_string(&self) -> String {
        let h = self.0 / 3600;
        let m = (self.0 % 3600) / 60;
        let s = self.0 % 60;
        format!("{h:02}:{m:02}:{s:02}")
    }

    /// Parses a `HH:MM:SS` string. GTFS allows hours beyond 23 to represent
    /// service past midnight, which this accepts without wrapping.
    pub fn from_hms(time: &str) -> Option<Self> {
        let mut split = time.trim().split(':');
        let hours: i32 = split.next()?.parse().ok()?;
        let minutes: i32 = split.next()?.parse().ok()?;
        let seconds: i32 = split.next()?.parse().ok()?;
        if split.next().is_some() || minutes >= 60 || seconds >= 60 || hours < 0 {
            return None;
        }
        Some(Self(hours * 3600 + minutes * 60 + seconds))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "+inf")
        } else {
            write!(f, "{}", self.to_hms_string())
        }
    }
}

impl Sub<Time> for Time {
    type Output = Duration;

    fn sub(self, rhs: Time) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        if self.is_infinite() {
            return self;
        }
        Time(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

/// An elapsed span of time, in seconds. Used for layovers, walk times and
/// journey durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Duration(i32);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub const fn from_seconds(secs: i32) -> Self {
        Self(secs)
    }

    pub const fn from_minutes(minutes: i32) -> Self {
        Self(minutes * 60)
    }

    pub const fn from_hours(hours: i32) -> Self {
        Self(hours * 60 * 60)
    }

    pub const fn as_seconds(&self) -> i32 {
        self.0
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Duration) {
        self.0 -= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_unparse_midnight() {
        let time = "00:00:00";
        let stime = Time::from_hms(time).unwrap();
        assert_eq!(time, stime.to_hms_string());
    }

    #[test]
    fn parse_unparse_noon() {
        let time = "12:00:00";
        let stime = Time::from_hms(time).unwrap();
        assert_eq!(time, stime.to_hms_string());
    }

    #[test]
    fn parse_seconds() {
        assert_eq!(Time::from_hms("00:01:30").unwrap().as_seconds(), 90);
        assert_eq!(Time::from_hms("01:01:30").unwrap().as_seconds(), 3690);
    }

    #[test]
    fn parse_past_midnight_service_day() {
        // GTFS services that run past midnight use hours >= 24.
        assert_eq!(Time::from_hms("25:00:00").unwrap().as_seconds(), 25 * 3600);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(Time::from_hms("00:00:0a").is_none());
        assert!(Time::from_hms("00:00").is_none());
        assert!(Time::from_hms("00:60:00").is_none());
    }

    #[test]
    fn infinity_is_absorbing_under_addition() {
        let t = Time::INFINITY + Duration::from_seconds(120);
        assert!(t.is_infinite());
    }

    #[test]
    fn subtraction_yields_duration() {
        let a = Time::from_hms("08:30:00").unwrap();
        let b = Time::from_hms("08:00:00").unwrap();
        assert_eq!((a - b).as_seconds(), 1800);
    }

    #[test]
    fn ordering_matches_seconds() {
        let a = Time::from_seconds(100);
        let b = Time::from_seconds(200);
        assert!(a < b);
        assert!(Time::INFINITY > b);
    }
}
