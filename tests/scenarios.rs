use approx::assert_relative_eq;
use station_traffic::scale::NEUTRAL_FLOW;
use station_traffic::*;

fn record(start: &str, end: &str, started_at: &str, ended_at: &str) -> TripRecord {
    TripRecord {
        start_station_id: start.into(),
        end_station_id: end.into(),
        started_at: started_at.into(),
        ended_at: ended_at.into(),
    }
}

fn two_stations() -> Vec<Station> {
    vec![
        Station::new("A", "Station A", -71.09, 42.36),
        Station::new("B", "Station B", -71.10, 42.35),
    ]
}

fn two_trips() -> MinuteBucketIndex {
    let records = vec![
        record("A", "B", "2024-03-01T08:00", "2024-03-01T08:10"),
        record("B", "A", "2024-03-01T08:05", "2024-03-01T08:20"),
    ];
    let (index, rejected) = MinuteBucketIndex::from_records(&records);
    assert!(rejected.is_empty());
    index
}

#[test]
fn test_unfiltered_scenario() {
    let index = two_trips();
    let mut stations = two_stations();
    compute_station_traffic(&mut stations, &index, TimeFilter::from_raw(-1).unwrap());

    for station in &stations {
        assert_eq!(station.traffic, Traffic::new(1, 1), "station {}", station.short_name);
        assert_eq!(station.traffic.total_traffic, 2);
    }
}

#[test]
fn test_filtered_scenarios() {
    let index = two_trips();
    let mut stations = two_stations();

    compute_station_traffic(&mut stations, &index, TimeFilter::from_raw(480).unwrap());
    assert!(stations.iter().all(|s| s.traffic == Traffic::new(1, 1)));

    compute_station_traffic(&mut stations, &index, TimeFilter::from_raw(700).unwrap());
    assert!(stations.iter().all(|s| s.traffic.total_traffic == 0));

    // empty window: every station still gets a radius and a neutral flow
    let mapper = ScaleMapper::new(&stations, TimeFilter::from_raw(700).unwrap());
    for station in &stations {
        let encoding = mapper.encode(station);
        assert_relative_eq!(encoding.radius, 3.0);
        assert_relative_eq!(encoding.flow, NEUTRAL_FLOW);
    }
}

#[test]
fn test_out_of_range_filter_is_rejected() {
    assert!(matches!(
        TimeFilter::from_raw(1440),
        Err(TrafficError::OutOfRangeTimeFilter(1440))
    ));
}

#[test]
fn test_window_matches_minute_range_for_every_center() {
    // one trip per minute of the day, all from the same station
    let records: Vec<TripRecord> = (0..MINUTES_PER_DAY)
        .map(|m| {
            let ts = format!("2024-03-01T{:02}:{:02}", m / 60, m % 60);
            record("A", "B", &ts, &ts)
        })
        .collect();
    let (index, _) = MinuteBucketIndex::from_records(&records);

    for center in (0..MINUTES_PER_DAY).step_by(7) {
        let filter = TimeFilter::from_raw(i64::from(center)).unwrap();
        let minutes: Vec<u16> = index
            .select(Direction::Departure, filter)
            .map(|trip| trip.start_minute().get())
            .collect();

        assert_eq!(minutes.len(), 120, "center {center}");
        let expected: Vec<u16> = (0..120)
            .map(|offset| (center + MINUTES_PER_DAY - WINDOW_RADIUS + offset) % MINUTES_PER_DAY)
            .collect();
        assert_eq!(minutes, expected, "center {center}");
    }
}

#[test]
fn test_unfiltered_matches_linear_scan_on_mixed_log() {
    let records = vec![
        record("A", "B", "2024-03-01 06:00:00", "2024-03-01 06:12:00"),
        record("A", "C", "2024-03-01 23:58:10", "2024-03-02 00:03:59"),
        record("C", "A", "2024-03-02 00:00:00", "2024-03-02 00:45:00"),
        record("B", "B", "2024-03-02 13:13:13", "2024-03-02 13:40:00"),
        record("Q", "A", "2024-03-02 17:00:00", "2024-03-02 17:05:00"),
    ];
    let (index, _) = MinuteBucketIndex::from_records(&records);
    let mut stations = two_stations();
    compute_station_traffic(&mut stations, &index, TimeFilter::Unfiltered);

    let linear = filter_trips_by_time(index.trips(), TimeFilter::Unfiltered);
    for station in &stations {
        let id = station.short_name.as_str();
        let departures = linear.iter().filter(|t| t.start_station_id == id).count() as u32;
        let arrivals = linear.iter().filter(|t| t.end_station_id == id).count() as u32;
        assert_eq!(station.traffic, Traffic::new(departures, arrivals));
    }
    assert_eq!(stations[0].traffic, Traffic::new(2, 2));
}
