use std::collections::HashMap;

use crate::index::{Direction, MinuteBucketIndex};
use crate::model::{Station, Traffic};
use crate::window::TimeFilter;

/// Departure and arrival counts of one query, keyed by station short name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrafficTally<'a> {
    departures: HashMap<&'a str, u32>,
    arrivals: HashMap<&'a str, u32>,
}

impl<'a> TrafficTally<'a> {
    pub fn count(index: &'a MinuteBucketIndex, filter: TimeFilter) -> Self {
        let mut tally = Self::default();
        for trip in index.select(Direction::Departure, filter) {
            *tally.departures.entry(trip.start_station_id.as_str()).or_insert(0) += 1;
        }
        for trip in index.select(Direction::Arrival, filter) {
            *tally.arrivals.entry(trip.end_station_id.as_str()).or_insert(0) += 1;
        }
        tally
    }

    /// Traffic for a station id; ids never seen count as zero.
    pub fn get(&self, station_id: &str) -> Traffic {
        Traffic::new(
            self.departures.get(station_id).copied().unwrap_or(0),
            self.arrivals.get(station_id).copied().unwrap_or(0),
        )
    }

    pub fn total_departures(&self) -> u32 {
        self.departures.values().sum()
    }

    pub fn total_arrivals(&self) -> u32 {
        self.arrivals.values().sum()
    }
}

/// Writes the traffic of `filter` into each station's `traffic` field.
///
/// Stations are enriched in place and their order is preserved; previous
/// values are overwritten, never accumulated. Callers that need several
/// concurrent views must hand in their own copies of the stations. Trips
/// referencing unknown stations are ignored.
pub fn compute_station_traffic<'s>(
    stations: &'s mut [Station],
    index: &MinuteBucketIndex,
    filter: TimeFilter,
) -> &'s mut [Station] {
    let tally = TrafficTally::count(index, filter);

    let (mut matched_departures, mut matched_arrivals) = (0, 0);
    for station in stations.iter_mut() {
        station.traffic = tally.get(&station.short_name);
        matched_departures += station.traffic.departures;
        matched_arrivals += station.traffic.arrivals;
    }

    let unmatched = tally.total_departures().saturating_sub(matched_departures)
        + tally.total_arrivals().saturating_sub(matched_arrivals);
    if unmatched > 0 {
        log::debug!("{} trip endpoints at {} reference unknown stations", unmatched, filter);
    }
    stations
}
