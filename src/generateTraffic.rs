use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::create_dir_all;
use std::path::PathBuf;

use station_traffic::ingest::{load_stations, load_trip_index};
use station_traffic::{compute_station_traffic, ScaleMapper, TimeFilter};

#[derive(Parser, Debug)]
#[command(
    name = "generateTraffic",
    version,
    about = "Write per-station bike traffic for one or more times of day",
    long_about = "Buckets the trip log by minute of day, then for every --time writes a CSV \
                  with each station's departures, arrivals, total traffic and the circle \
                  radius and flow bucket used to draw it. A time selects trips within \
                  60 minutes either side, wrapping past midnight."
)]
struct Args {
    /// GBFS station_information JSON
    #[arg(short, long, default_value = "data/bluebikes-stations.json")]
    stations: PathBuf,

    /// Trip CSV with start_station_id, end_station_id, started_at, ended_at
    #[arg(short, long, default_value = "data/bluebikes-traffic-2024-03.csv")]
    trips: PathBuf,

    /// Time of day: `any`, -1, a minute (0-1439) or HH:MM. Repeatable.
    #[arg(long = "time", default_value = "any", allow_hyphen_values = true)]
    times: Vec<TimeFilter>,

    /// Output directory for the CSV files
    #[arg(short, long, default_value = "processed")]
    output: PathBuf,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    short_name: &'a str,
    name: &'a str,
    lon: f64,
    lat: f64,
    departures: u32,
    arrivals: u32,
    total_traffic: u32,
    radius: f64,
    flow: f64,
}

fn file_stem(filter: TimeFilter) -> String {
    match filter {
        TimeFilter::Unfiltered => "any".to_string(),
        TimeFilter::At(minute) => format!("{:02}{:02}", minute.get() / 60, minute.get() % 60),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    if !args.trips.exists() {
        bail!("Trip file does not exist: {}", args.trips.display());
    }
    create_dir_all(&args.output)?;

    let mut stations = load_stations(&args.stations).context("Failed to read stations")?;
    let (index, rejected) = load_trip_index(&args.trips).context("Failed to read trips")?;
    if !rejected.is_empty() {
        log::warn!("{} trips had unparseable timestamps and were left out", rejected.len());
    }

    for &filter in &args.times {
        compute_station_traffic(&mut stations, &index, filter);
        let mapper = ScaleMapper::new(&stations, filter);

        let output_file_path = args.output.join(format!("{}.csv", file_stem(filter)));
        let mut wtr = csv::Writer::from_path(&output_file_path)
            .with_context(|| format!("Failed to create {}", output_file_path.display()))?;
        for station in &stations {
            let encoding = mapper.encode(station);
            wtr.serialize(Row {
                short_name: &station.short_name,
                name: &station.name,
                lon: station.lon,
                lat: station.lat,
                departures: station.traffic.departures,
                arrivals: station.traffic.arrivals,
                total_traffic: station.traffic.total_traffic,
                radius: encoding.radius,
                flow: encoding.flow,
            })?;
        }
        wtr.flush()?;

        let busiest = stations.iter().map(|s| s.traffic.total_traffic).max().unwrap_or(0);
        log::info!(
            "{}: busiest station {} trips, wrote {}",
            filter,
            busiest,
            output_file_path.display()
        );
    }

    println!("Processed data saved in '{}'.", args.output.display());

    Ok(())
}
