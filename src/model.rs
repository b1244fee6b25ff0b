use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrafficError};
use crate::minute::MinuteOfDay;

/// Wall-clock formats accepted for trip timestamps, tried after RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Per-query traffic of one station. Overwritten by every aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Traffic {
    pub departures: u32,
    pub arrivals: u32,
    pub total_traffic: u32,
}

impl Traffic {
    pub fn new(departures: u32, arrivals: u32) -> Self {
        Self {
            departures,
            arrivals,
            total_traffic: departures + arrivals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub short_name: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    #[serde(flatten)]
    pub traffic: Traffic,
}

impl Station {
    pub fn new(short_name: impl Into<String>, name: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            short_name: short_name.into(),
            name: name.into(),
            lon,
            lat,
            traffic: Traffic::default(),
        }
    }
}

/// A trip with its timestamps already parsed. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

impl Trip {
    pub fn start_minute(&self) -> MinuteOfDay {
        MinuteOfDay::of(&self.started_at)
    }

    pub fn end_minute(&self) -> MinuteOfDay {
        MinuteOfDay::of(&self.ended_at)
    }
}

/// A trip row as it appears in the source CSV, timestamps still text.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRecord {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: String,
    pub ended_at: String,
}

impl TripRecord {
    pub fn parse(&self) -> Result<Trip> {
        Ok(Trip {
            start_station_id: self.start_station_id.clone(),
            end_station_id: self.end_station_id.clone(),
            started_at: parse_timestamp("started_at", &self.started_at)?,
            ended_at: parse_timestamp("ended_at", &self.ended_at)?,
        })
    }
}

/// Parses a trip timestamp into its wall-clock value.
///
/// Offsets are honoured only to the extent that the local time written in
/// the string is kept; a bad value is an error, never midnight.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| TrafficError::MalformedTimestamp {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(started_at: &str, ended_at: &str) -> TripRecord {
        TripRecord {
            start_station_id: "A".into(),
            end_station_id: "B".into(),
            started_at: started_at.into(),
            ended_at: ended_at.into(),
        }
    }

    #[test]
    fn test_parse_accepted_formats() {
        for value in [
            "2024-03-01T08:05",
            "2024-03-01 08:05",
            "2024-03-01 08:05:13",
            "2024-03-01 08:05:13.365",
            "2024-03-01T08:05:13-05:00",
        ] {
            let ts = parse_timestamp("started_at", value).unwrap();
            assert_eq!(MinuteOfDay::of(&ts).get(), 485, "{value}");
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = record("not a time", "2024-03-01T08:30").parse().unwrap_err();
        match err {
            TrafficError::MalformedTimestamp { field, value } => {
                assert_eq!(field, "started_at");
                assert_eq!(value, "not a time");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = record("2024-03-01T08:00", "").parse().unwrap_err();
        assert!(matches!(err, TrafficError::MalformedTimestamp { field: "ended_at", .. }));
    }

    #[test]
    fn test_trip_minutes() {
        let trip = record("2024-03-01T23:50", "2024-03-02T00:10").parse().unwrap();
        assert_eq!(trip.start_minute().get(), 1430);
        assert_eq!(trip.end_minute().get(), 10);
    }

    #[test]
    fn test_traffic_total() {
        let traffic = Traffic::new(3, 4);
        assert_eq!(traffic.total_traffic, 7);
        assert_eq!(Traffic::default().total_traffic, 0);
    }
}
