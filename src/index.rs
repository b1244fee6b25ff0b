//! Minute-of-day bucketing of a trip log.
//!
//! Trips are stored once; each of the two series (departures keyed by start
//! minute, arrivals keyed by end minute) holds 1440 buckets of positions into
//! that store, in insertion order.

use crate::minute::{MinuteOfDay, MINUTES_PER_DAY};
use crate::model::{Trip, TripRecord};
use crate::error::TrafficError;
use crate::window::{self, TimeFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Departure,
    Arrival,
}

/// A record that was left out of the index, with its 0-based row.
#[derive(Debug)]
pub struct RejectedTrip {
    pub row: usize,
    pub error: TrafficError,
}

#[derive(Debug, Clone)]
pub struct MinuteBucketIndex {
    trips: Vec<Trip>,
    departures: Vec<Vec<usize>>,
    arrivals: Vec<Vec<usize>>,
}

impl Default for MinuteBucketIndex {
    fn default() -> Self {
        Self {
            trips: Vec::new(),
            departures: vec![Vec::new(); MINUTES_PER_DAY as usize],
            arrivals: vec![Vec::new(); MINUTES_PER_DAY as usize],
        }
    }
}

impl MinuteBucketIndex {
    pub fn build(trips: Vec<Trip>) -> Self {
        let mut index = Self::default();
        index.trips.reserve(trips.len());
        for trip in trips {
            index.push(trip);
        }
        log::debug!("Indexed {} trips into {} minute buckets", index.len(), MINUTES_PER_DAY);
        index
    }

    /// Parses and indexes raw records. Records with an unparseable timestamp
    /// are skipped and reported rather than bucketed at midnight.
    pub fn from_records<'a, I>(records: I) -> (Self, Vec<RejectedTrip>)
    where
        I: IntoIterator<Item = &'a TripRecord>,
    {
        let mut index = Self::default();
        let mut rejected = Vec::new();
        for (row, record) in records.into_iter().enumerate() {
            match record.parse() {
                Ok(trip) => index.push(trip),
                Err(error) => {
                    log::warn!("Skipping trip at row {}: {}", row, error);
                    rejected.push(RejectedTrip { row, error });
                }
            }
        }
        (index, rejected)
    }

    pub fn push(&mut self, trip: Trip) {
        let position = self.trips.len();
        self.departures[trip.start_minute().index()].push(position);
        self.arrivals[trip.end_minute().index()].push(position);
        self.trips.push(trip);
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// All 1440 buckets of one series, indexed by minute-of-day.
    pub fn buckets(&self, direction: Direction) -> &[Vec<usize>] {
        match direction {
            Direction::Departure => &self.departures,
            Direction::Arrival => &self.arrivals,
        }
    }

    pub fn bucket(&self, direction: Direction, minute: MinuteOfDay) -> impl Iterator<Item = &Trip> + '_ {
        self.buckets(direction)[minute.index()]
            .iter()
            .map(move |&position| &self.trips[position])
    }

    /// Trips of one series inside the circular window of `filter`, late-night
    /// segment first when the window crosses midnight.
    pub fn select(&self, direction: Direction, filter: TimeFilter) -> impl Iterator<Item = &Trip> + '_ {
        window::select(self.buckets(direction), filter).map(move |&position| &self.trips[position])
    }

    /// Bucket sizes summed per hour of day.
    pub fn hourly_counts(&self, direction: Direction) -> [usize; 24] {
        let mut counts = [0; 24];
        for (minute, bucket) in self.buckets(direction).iter().enumerate() {
            counts[minute / 60] += bucket.len();
        }
        counts
    }
}
