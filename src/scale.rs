//! Visual encodings derived from station traffic: circle radius from total
//! traffic and a three-step flow bucket from the departure share.

use serde::Serialize;

use crate::model::{Station, Traffic};
use crate::window::TimeFilter;

pub const UNFILTERED_RADIUS_RANGE: (f64, f64) = (0.0, 25.0);
/// A two-hour window has far smaller counts, so circles get a wider range
/// and a visible minimum.
pub const FILTERED_RADIUS_RANGE: (f64, f64) = (3.0, 50.0);

pub const FLOW_BUCKETS: [f64; 3] = [0.0, 0.5, 1.0];
/// Flow bucket used for stations with no traffic at all.
pub const NEUTRAL_FLOW: f64 = 0.5;

/// Square-root scale from `[0, max]` onto an output range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    max: f64,
    range: (f64, f64),
}

impl SqrtScale {
    pub fn new(max: f64, range: (f64, f64)) -> Self {
        Self { max, range }
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// An empty domain (`max == 0`) maps everything to the range start.
    pub fn scale(&self, value: f64) -> f64 {
        let (lo, hi) = self.range;
        if self.max <= 0.0 {
            return lo;
        }
        let t = value.max(0.0).sqrt() / self.max.sqrt();
        lo + (hi - lo) * t
    }
}

/// Quantizing scale: splits `[lo, hi]` into equal segments, one per output.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizeScale {
    thresholds: Vec<f64>,
    outputs: Vec<f64>,
}

impl QuantizeScale {
    pub fn new(domain: (f64, f64), outputs: &[f64]) -> Self {
        let (lo, hi) = domain;
        let n = outputs.len();
        let thresholds = (1..n).map(|i| lo + (hi - lo) * i as f64 / n as f64).collect();
        Self {
            thresholds,
            outputs: outputs.to_vec(),
        }
    }

    /// Output for `value`; `None` for NaN. Values outside the domain clamp
    /// to the first or last output.
    pub fn scale(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        let bucket = self.thresholds.iter().take_while(|&&t| t <= value).count();
        self.outputs.get(bucket).copied()
    }
}

/// Departures over total traffic, `None` when the station saw no trips.
pub fn flow_ratio(traffic: &Traffic) -> Option<f64> {
    (traffic.total_traffic > 0).then(|| f64::from(traffic.departures) / f64::from(traffic.total_traffic))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationEncoding {
    pub radius: f64,
    pub flow: f64,
}

/// Scales for one aggregation pass. Rebuild after every filter change: the
/// radius domain tracks the busiest station of the current window.
#[derive(Debug, Clone)]
pub struct ScaleMapper {
    radius: SqrtScale,
    flow: QuantizeScale,
}

impl ScaleMapper {
    pub fn new(stations: &[Station], filter: TimeFilter) -> Self {
        let max = stations
            .iter()
            .map(|station| station.traffic.total_traffic)
            .max()
            .unwrap_or(0);
        let range = if filter.is_filtered() {
            FILTERED_RADIUS_RANGE
        } else {
            UNFILTERED_RADIUS_RANGE
        };
        Self {
            radius: SqrtScale::new(f64::from(max), range),
            flow: QuantizeScale::new((0.0, 1.0), &FLOW_BUCKETS),
        }
    }

    pub fn radius_scale(&self) -> &SqrtScale {
        &self.radius
    }

    pub fn radius(&self, station: &Station) -> f64 {
        self.radius.scale(f64::from(station.traffic.total_traffic))
    }

    pub fn flow(&self, station: &Station) -> f64 {
        flow_ratio(&station.traffic)
            .and_then(|ratio| self.flow.scale(ratio))
            .unwrap_or(NEUTRAL_FLOW)
    }

    pub fn encode(&self, station: &Station) -> StationEncoding {
        StationEncoding {
            radius: self.radius(station),
            flow: self.flow(station),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn station(departures: u32, arrivals: u32) -> Station {
        let mut station = Station::new("S", "Station", 0.0, 0.0);
        station.traffic = Traffic::new(departures, arrivals);
        station
    }

    #[test]
    fn test_sqrt_scale() {
        let scale = SqrtScale::new(100.0, (0.0, 25.0));
        assert_relative_eq!(scale.scale(0.0), 0.0);
        assert_relative_eq!(scale.scale(25.0), 12.5);
        assert_relative_eq!(scale.scale(100.0), 25.0);

        let filtered = SqrtScale::new(16.0, (3.0, 50.0));
        assert_relative_eq!(filtered.scale(0.0), 3.0);
        assert_relative_eq!(filtered.scale(4.0), 3.0 + 47.0 * 0.5);
    }

    #[test]
    fn test_sqrt_scale_empty_domain() {
        let scale = SqrtScale::new(0.0, (3.0, 50.0));
        assert_relative_eq!(scale.scale(0.0), 3.0);
    }

    #[test]
    fn test_quantize_thresholds() {
        let scale = QuantizeScale::new((0.0, 1.0), &FLOW_BUCKETS);
        assert_eq!(scale.scale(0.0), Some(0.0));
        assert_eq!(scale.scale(0.3), Some(0.0));
        assert_eq!(scale.scale(0.34), Some(0.5));
        assert_eq!(scale.scale(0.5), Some(0.5));
        assert_eq!(scale.scale(0.67), Some(1.0));
        assert_eq!(scale.scale(1.0), Some(1.0));
        assert_eq!(scale.scale(-2.0), Some(0.0));
        assert_eq!(scale.scale(7.0), Some(1.0));
        assert_eq!(scale.scale(f64::NAN), None);
    }

    #[test]
    fn test_flow_ratio() {
        assert_eq!(flow_ratio(&Traffic::new(0, 0)), None);
        assert_relative_eq!(flow_ratio(&Traffic::new(1, 3)).unwrap(), 0.25);
        assert_relative_eq!(flow_ratio(&Traffic::new(4, 0)).unwrap(), 1.0);
    }

    #[test]
    fn test_mapper_ranges_follow_filter() {
        let stations = vec![station(30, 34), station(0, 16), station(0, 0)];

        let unfiltered = ScaleMapper::new(&stations, TimeFilter::Unfiltered);
        assert_eq!(unfiltered.radius_scale().range(), UNFILTERED_RADIUS_RANGE);
        assert_relative_eq!(unfiltered.radius(&stations[0]), 25.0);
        assert_relative_eq!(unfiltered.radius(&stations[1]), 12.5);
        assert_relative_eq!(unfiltered.radius(&stations[2]), 0.0);

        let filtered = ScaleMapper::new(&stations, TimeFilter::from_raw(480).unwrap());
        assert_eq!(filtered.radius_scale().range(), FILTERED_RADIUS_RANGE);
        assert_relative_eq!(filtered.radius(&stations[0]), 50.0);
        assert_relative_eq!(filtered.radius(&stations[2]), 3.0);
    }

    #[test]
    fn test_mapper_flow_buckets() {
        let stations = vec![station(9, 1), station(1, 9), station(5, 5), station(0, 0)];
        let mapper = ScaleMapper::new(&stations, TimeFilter::Unfiltered);

        assert_relative_eq!(mapper.flow(&stations[0]), 1.0);
        assert_relative_eq!(mapper.flow(&stations[1]), 0.0);
        assert_relative_eq!(mapper.flow(&stations[2]), 0.5);
        // no traffic: neutral instead of NaN
        assert_relative_eq!(mapper.flow(&stations[3]), NEUTRAL_FLOW);
    }

    #[test]
    fn test_mapper_with_no_stations() {
        let mapper = ScaleMapper::new(&[], TimeFilter::Unfiltered);
        let encoding = mapper.encode(&station(0, 0));
        assert_relative_eq!(encoding.radius, 0.0);
        assert_relative_eq!(encoding.flow, NEUTRAL_FLOW);
    }
}
