//! Circular time-of-day window over minute buckets.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::{Result, TrafficError};
use crate::minute::{MinuteOfDay, MINUTES_PER_DAY};
use crate::model::Trip;

/// Minutes on each side of the window center.
pub const WINDOW_RADIUS: u16 = 60;

const UNFILTERED_SENTINEL: i64 = -1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    Unfiltered,
    At(MinuteOfDay),
}

impl TimeFilter {
    /// Accepts the slider value: `-1` for any time, otherwise a minute in `0..1440`.
    pub fn from_raw(value: i64) -> Result<Self> {
        if value == UNFILTERED_SENTINEL {
            return Ok(Self::Unfiltered);
        }
        u16::try_from(value)
            .ok()
            .and_then(MinuteOfDay::new)
            .map(Self::At)
            .ok_or(TrafficError::OutOfRangeTimeFilter(value))
    }

    pub fn is_filtered(self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Bucket ranges covered by this filter, in query order. The second
    /// range is empty unless the window crosses midnight.
    pub fn ranges(self) -> (Range<usize>, Range<usize>) {
        let day = MINUTES_PER_DAY as usize;
        let center = match self {
            Self::Unfiltered => return (0..day, 0..0),
            Self::At(minute) => minute.index(),
        };
        let radius = WINDOW_RADIUS as usize;
        let lo = (center + day - radius) % day;
        let hi = (center + radius) % day;
        if lo <= hi {
            (lo..hi, 0..0)
        } else {
            (lo..day, 0..hi)
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unfiltered => write!(f, "any time"),
            Self::At(minute) => write!(f, "{}", minute.format_12h()),
        }
    }
}

/// Parses `any`, `-1`, a bare minute (`480`) or a clock time (`08:00`).
impl FromStr for TimeFilter {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") {
            return Ok(Self::Unfiltered);
        }
        if let Some((hour, minute)) = s.split_once(':') {
            let parsed = hour.parse::<u32>().ok().zip(minute.parse::<u32>().ok());
            return parsed
                .and_then(|(hour, minute)| MinuteOfDay::from_hm(hour, minute))
                .map(Self::At)
                .ok_or_else(|| TrafficError::InvalidTimeFilter(s.to_string()));
        }
        let value = s
            .parse::<i64>()
            .map_err(|_| TrafficError::InvalidTimeFilter(s.to_string()))?;
        Self::from_raw(value)
    }
}

/// Flattens the buckets covered by `filter`: ascending bucket order, each
/// bucket in its own order. Cost is proportional to the window, not to the
/// whole series.
pub fn select<T>(buckets: &[Vec<T>], filter: TimeFilter) -> impl Iterator<Item = &T> + '_ {
    let (first, second) = filter.ranges();
    buckets[first]
        .iter()
        .chain(buckets[second].iter())
        .flat_map(|bucket| bucket.iter())
}

/// Linear scan kept as a reference path: a trip matches when its start or
/// end minute lies within 60 minutes of the filter, without wrapping past
/// midnight. Not used by the aggregator.
pub fn filter_trips_by_time(trips: &[Trip], filter: TimeFilter) -> Vec<&Trip> {
    let center = match filter {
        TimeFilter::Unfiltered => return trips.iter().collect(),
        TimeFilter::At(minute) => i32::from(minute.get()),
    };
    let near = |minute: MinuteOfDay| (i32::from(minute.get()) - center).abs() <= i32::from(WINDOW_RADIUS);
    trips
        .iter()
        .filter(|trip| near(trip.start_minute()) || near(trip.end_minute()))
        .collect()
}
