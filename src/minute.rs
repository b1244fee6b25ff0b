use chrono::{NaiveTime, Timelike};
use std::fmt;

/// Number of minutes in a day, and the number of buckets in each series.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Elapsed minutes since local midnight, always in `0..1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub const MIDNIGHT: MinuteOfDay = MinuteOfDay(0);

    pub fn new(minute: u16) -> Option<Self> {
        (minute < MINUTES_PER_DAY).then_some(Self(minute))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self((hour * 60 + minute) as u16))
    }

    /// Minute-of-day of any wall-clock value (seconds are dropped).
    pub fn of<T: Timelike>(time: &T) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Slider label, e.g. `8:00 AM`.
    pub fn format_12h(self) -> String {
        let time = NaiveTime::from_hms_opt(u32::from(self.0 / 60), u32::from(self.0 % 60), 0)
            .unwrap_or(NaiveTime::MIN);
        time.format("%-I:%M %p").to_string()
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}
