use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use crate::error::{Result, TrafficError};
use crate::index::{Direction, MinuteBucketIndex};
use crate::model::Station;
use crate::scale::ScaleMapper;

type DrawResult = std::result::Result<(), Box<dyn Error + Send + Sync>>;

const DEPARTURE_COLOR: RGBColor = RGBColor(70, 130, 180); // steelblue
const ARRIVAL_COLOR: RGBColor = RGBColor(255, 140, 0); // darkorange

/// Mixes the arrival and departure colours by flow bucket (1 = all departures).
pub fn flow_color(flow: f64) -> RGBColor {
    let t = flow.clamp(0.0, 1.0);
    let mix = |departure: u8, arrival: u8| {
        (f64::from(departure) * t + f64::from(arrival) * (1.0 - t)).round() as u8
    };
    RGBColor(
        mix(DEPARTURE_COLOR.0, ARRIVAL_COLOR.0),
        mix(DEPARTURE_COLOR.1, ARRIVAL_COLOR.1),
        mix(DEPARTURE_COLOR.2, ARRIVAL_COLOR.2),
    )
}

/// Longitude and latitude extents of the stations, padded by 5%.
fn station_bounds(stations: &[Station]) -> ((f64, f64), (f64, f64)) {
    if stations.is_empty() {
        return ((-1.0, 1.0), (-1.0, 1.0));
    }
    let fold = |f: fn(&Station) -> f64| {
        stations
            .iter()
            .map(f)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
    };
    let pad = |(lo, hi): (f64, f64)| {
        let margin = ((hi - lo) * 0.05).max(1e-3);
        (lo - margin, hi + margin)
    };
    (pad(fold(|s| s.lon)), pad(fold(|s| s.lat)))
}

/// Draws every station as a circle sized by traffic and coloured by flow.
pub fn draw_station_map(
    filename: &Path,
    caption: &str,
    stations: &[Station],
    mapper: &ScaleMapper,
) -> Result<()> {
    render_station_map(filename, caption, stations, mapper).map_err(|e| TrafficError::Chart(e.to_string()))
}

fn render_station_map(filename: &Path, caption: &str, stations: &[Station], mapper: &ScaleMapper) -> DrawResult {
    let root = BitMapBackend::new(filename, (1600, 1600)).into_drawing_area();
    root.fill(&WHITE)?;

    let ((lon_lo, lon_hi), (lat_lo, lat_hi)) = station_bounds(stations);
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 50))
        .margin(40)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(lon_lo..lon_hi, lat_lo..lat_hi)?;

    chart.configure_mesh()
        .disable_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .label_style(("sans-serif", 24))
        .draw()?;

    chart.draw_series(stations.iter().map(|station| {
        let encoding = mapper.encode(station);
        Circle::new(
            (station.lon, station.lat),
            encoding.radius.round() as i32,
            flow_color(encoding.flow).mix(0.6).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Line chart of departures and arrivals per hour of day.
pub fn draw_hourly_chart(filename: &Path, index: &MinuteBucketIndex) -> Result<()> {
    render_hourly_chart(filename, index).map_err(|e| TrafficError::Chart(e.to_string()))
}

fn render_hourly_chart(filename: &Path, index: &MinuteBucketIndex) -> DrawResult {
    let departures = index.hourly_counts(Direction::Departure);
    let arrivals = index.hourly_counts(Direction::Arrival);
    let max_hourly = departures.iter().chain(arrivals.iter()).copied().max().unwrap_or(0);

    let root = BitMapBackend::new(filename, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Trips by Hour of Day", ("sans-serif", 50))
        .margin(60)
        .set_label_area_size(LabelAreaPosition::Left, 100)
        .set_label_area_size(LabelAreaPosition::Bottom, 80)
        .build_cartesian_2d(0..23usize, 0..(max_hourly + max_hourly / 10 + 1))?;

    chart.configure_mesh()
        .x_desc("Hour")
        .y_desc("Trips")
        .label_style(("sans-serif", 30))
        .draw()?;

    for (label, counts, color) in [("Departures", departures, DEPARTURE_COLOR), ("Arrivals", arrivals, ARRIVAL_COLOR)] {
        let series: Vec<(usize, usize)> = counts.iter().copied().enumerate().collect();

        chart.draw_series(LineSeries::new(series.clone(), color.stroke_width(3)))?;
        chart.draw_series(series.iter().map(|&point| {
            Circle::new(point, 7, color.filled())
        }))?
        .label(label)
        .legend(move |(x, y)| {
            Circle::new((x + 10, y), 7, color.filled())
        });
    }

    chart.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 30))
        .draw()?;

    root.present()?;
    Ok(())
}
