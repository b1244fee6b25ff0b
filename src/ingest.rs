use csv::Reader;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::Result;
use crate::index::{MinuteBucketIndex, RejectedTrip};
use crate::model::{Station, Trip, TripRecord};

/// GBFS `station_information` feed, reduced to the fields we draw.
#[derive(Debug, Deserialize)]
struct StationFeed {
    data: StationFeedData,
}

#[derive(Debug, Deserialize)]
struct StationFeedData {
    stations: Vec<StationRecord>,
}

#[derive(Debug, Deserialize)]
struct StationRecord {
    short_name: String,
    name: String,
    lat: f64,
    lon: f64,
}

impl From<StationRecord> for Station {
    fn from(record: StationRecord) -> Self {
        Station::new(record.short_name, record.name, record.lon, record.lat)
    }
}

pub fn read_stations<R: Read>(reader: R) -> Result<Vec<Station>> {
    let feed: StationFeed = serde_json::from_reader(reader)?;
    Ok(feed.data.stations.into_iter().map(Station::from).collect())
}

pub fn load_stations(path: &Path) -> Result<Vec<Station>> {
    let stations = read_stations(BufReader::new(File::open(path)?))?;
    log::info!("Loaded {} stations from {}", stations.len(), path.display());
    Ok(stations)
}

pub fn read_trip_records<R: Read>(reader: R, pb: &ProgressBar) -> Result<Vec<TripRecord>> {
    let mut rdr = Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in pb.wrap_iter(rdr.deserialize()) {
        let record: TripRecord = result?;
        records.push(record);
    }
    Ok(records)
}

/// Parses every record's timestamps in parallel, keeping input order.
pub fn parse_trips(records: &[TripRecord]) -> (Vec<Trip>, Vec<RejectedTrip>) {
    let parsed: Vec<_> = records.par_iter().map(TripRecord::parse).collect();

    let mut trips = Vec::with_capacity(parsed.len());
    let mut rejected = Vec::new();
    for (row, result) in parsed.into_iter().enumerate() {
        match result {
            Ok(trip) => trips.push(trip),
            Err(error) => {
                log::warn!("Skipping trip at row {}: {}", row, error);
                rejected.push(RejectedTrip { row, error });
            }
        }
    }
    (trips, rejected)
}

/// Reads a trip CSV and builds its minute index.
pub fn load_trip_index(path: &Path) -> Result<(MinuteBucketIndex, Vec<RejectedTrip>)> {
    // Count data rows (minus header) for the progress bar.
    let total_lines = {
        let file = File::open(path)?;
        BufReader::new(file).lines().count().saturating_sub(1)
    };

    let pb = ProgressBar::new(total_lines as u64);
    pb.set_message("Reading trips...");
    pb.set_style(indicatif::ProgressStyle::default_bar()
        .template("{msg} {wide_bar} {pos}/{len} ({eta})")
        .progress_chars("█▒░"));

    let records = read_trip_records(File::open(path)?, &pb)?;
    pb.finish_with_message("Trip CSV read.");

    let (trips, rejected) = parse_trips(&records);
    let index = MinuteBucketIndex::build(trips);
    log::info!(
        "Indexed {} trips from {} ({} rejected)",
        index.len(),
        path.display(),
        rejected.len()
    );
    Ok((index, rejected))
}
