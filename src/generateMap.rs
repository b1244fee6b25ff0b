use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use station_traffic::chart::{draw_hourly_chart, draw_station_map};
use station_traffic::ingest::{load_stations, load_trip_index};
use station_traffic::{compute_station_traffic, ScaleMapper, TimeFilter};

#[derive(Parser, Debug)]
#[command(
    name = "generateMap",
    version,
    about = "Render station traffic circles and an hourly trip chart to PNG"
)]
struct Args {
    /// GBFS station_information JSON
    #[arg(short, long, default_value = "data/bluebikes-stations.json")]
    stations: PathBuf,

    /// Trip CSV with start_station_id, end_station_id, started_at, ended_at
    #[arg(short, long, default_value = "data/bluebikes-traffic-2024-03.csv")]
    trips: PathBuf,

    /// Time of day: `any`, -1, a minute (0-1439) or HH:MM
    #[arg(long, default_value = "any", allow_hyphen_values = true)]
    time: TimeFilter,

    /// Station map PNG
    #[arg(short, long, default_value = "station_traffic_map.png")]
    output: PathBuf,

    /// Also draw departures and arrivals per hour to this PNG
    #[arg(long)]
    hourly_output: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
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

    let mut stations = load_stations(&args.stations).context("Failed to read stations")?;
    let (index, rejected) = load_trip_index(&args.trips).context("Failed to read trips")?;
    if !rejected.is_empty() {
        log::warn!("{} trips had unparseable timestamps and were left out", rejected.len());
    }

    compute_station_traffic(&mut stations, &index, args.time);
    let mapper = ScaleMapper::new(&stations, args.time);

    let caption = format!("Station Traffic ({})", args.time);
    draw_station_map(&args.output, &caption, &stations, &mapper).context("Failed to draw station map")?;
    log::info!("Wrote station map to {}", args.output.display());

    if let Some(hourly_path) = &args.hourly_output {
        draw_hourly_chart(hourly_path, &index).context("Failed to draw hourly chart")?;
        log::info!("Wrote hourly chart to {}", hourly_path.display());
    }

    println!("\nCharts generated successfully.");
    Ok(())
}
