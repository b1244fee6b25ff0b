//! # station_traffic
//!
//! Time-of-day traffic for bike-share stations.
//!
//! A trip log is bucketed once by minute-of-day ([`MinuteBucketIndex`]). Each
//! query then reads only the buckets inside a two-hour circular window
//! ([`TimeFilter`]), rolls the selected trips up into per-station departure
//! and arrival counts ([`compute_station_traffic`]) and derives circle radius
//! and flow colour encodings from them ([`ScaleMapper`]).
//!
//! ## Example
//!
//! ```
//! use station_traffic::*;
//!
//! let records = vec![
//!     TripRecord {
//!         start_station_id: "A".into(),
//!         end_station_id: "B".into(),
//!         started_at: "2024-03-01T08:00".into(),
//!         ended_at: "2024-03-01T08:20".into(),
//!     },
//! ];
//! let (index, rejected) = MinuteBucketIndex::from_records(&records);
//! assert!(rejected.is_empty());
//!
//! let mut stations = vec![Station::new("A", "Alpha", -71.09, 42.36), Station::new("B", "Bravo", -71.1, 42.35)];
//! let filter: TimeFilter = "08:30".parse().unwrap();
//! compute_station_traffic(&mut stations, &index, filter);
//! assert_eq!(stations[0].traffic.departures, 1);
//!
//! let mapper = ScaleMapper::new(&stations, filter);
//! assert_eq!(mapper.radius(&stations[0]), 50.0);
//! assert_eq!(mapper.flow(&stations[1]), 0.0);
//! ```

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod index;
pub mod ingest;
pub mod minute;
pub mod model;
pub mod scale;
pub mod window;

pub use aggregate::{compute_station_traffic, TrafficTally};
pub use error::{Result, TrafficError};
pub use index::{Direction, MinuteBucketIndex, RejectedTrip};
pub use minute::{MinuteOfDay, MINUTES_PER_DAY};
pub use model::{Station, Traffic, Trip, TripRecord};
pub use scale::{flow_ratio, ScaleMapper, StationEncoding};
pub use window::{filter_trips_by_time, TimeFilter, WINDOW_RADIUS};
