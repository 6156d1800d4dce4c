//! Property-based tests for filtering, aggregation, and scales.

use chrono::NaiveDate;
use geom::LonLat;
use proptest::prelude::*;

use model::bikeshare::{Station, StationCode, Trip};
use model::{
    compute_station_traffic, departure_ratio, filter_trips, QuantizeScale, RadiusScale,
    TimeFilter, MAX_RADIUS,
};

const CODES: [&str; 5] = ["A", "B", "C", "D", "X"];

fn stations() -> Vec<Station> {
    // No station has code "X"
    CODES[..4]
        .iter()
        .enumerate()
        .map(|(idx, code)| Station {
            code: StationCode::new(*code),
            pos: LonLat::new(-71.1 + 0.01 * idx as f64, 42.37),
            name: None,
            capacity: None,
        })
        .collect()
}

fn arb_trip() -> impl Strategy<Value = Trip> {
    (0..CODES.len(), 0..CODES.len(), 1u32..29, 0u32..1440, 0u32..180).prop_map(
        |(start, end, day, start_minute, duration)| {
            let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
            let started_at = date
                .and_hms_opt(start_minute / 60, start_minute % 60, 0)
                .unwrap();
            let ended_at = started_at + chrono::Duration::minutes(duration as i64);
            Trip {
                ride_id: None,
                bike_type: None,
                is_member: None,
                start_station: StationCode::new(CODES[start]),
                end_station: StationCode::new(CODES[end]),
                started_at,
                ended_at,
            }
        },
    )
}

fn arb_filter() -> impl Strategy<Value = TimeFilter> {
    (-1i32..1440).prop_map(|x| TimeFilter::from_slider(x).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_any_is_identity(trips in prop::collection::vec(arb_trip(), 0..50)) {
        let filtered = filter_trips(&trips, TimeFilter::Any);
        prop_assert_eq!(filtered.len(), trips.len());
        for (a, b) in filtered.iter().zip(trips.iter()) {
            prop_assert!(std::ptr::eq(*a, b));
        }
    }

    #[test]
    fn prop_total_is_sum(
        trips in prop::collection::vec(arb_trip(), 0..50),
        filter in arb_filter(),
    ) {
        let traffic = compute_station_traffic(&stations(), filter_trips(&trips, filter));
        for t in &traffic {
            prop_assert_eq!(t.total_traffic(), t.arrivals() + t.departures());
        }
    }

    #[test]
    fn prop_counts_match_filtered_trips(
        trips in prop::collection::vec(arb_trip(), 0..50),
        filter in arb_filter(),
    ) {
        let stations = stations();
        let filtered = filter_trips(&trips, filter);
        let traffic = compute_station_traffic(&stations, filtered.iter().copied());

        let known = |code: &StationCode| stations.iter().any(|s| &s.code == code);
        let departures: usize = traffic.iter().map(|t| t.departures()).sum();
        let arrivals: usize = traffic.iter().map(|t| t.arrivals()).sum();
        prop_assert_eq!(departures, filtered.iter().filter(|t| known(&t.start_station)).count());
        prop_assert_eq!(arrivals, filtered.iter().filter(|t| known(&t.end_station)).count());
    }

    #[test]
    fn prop_radius_endpoints(
        trips in prop::collection::vec(arb_trip(), 0..50),
        filter in arb_filter(),
    ) {
        let traffic = compute_station_traffic(&stations(), filter_trips(&trips, filter));
        let scale = RadiusScale::for_stations(&traffic);
        prop_assert_eq!(scale.radius(0), 0.0);
        let max = traffic.iter().map(|t| t.total_traffic()).max().unwrap_or(0);
        if max > 0 {
            prop_assert_eq!(scale.radius(max), MAX_RADIUS);
        }
        for t in &traffic {
            prop_assert!(scale.radius(t.total_traffic()) <= MAX_RADIUS);
        }
    }

    #[test]
    fn prop_flow_is_bucketed(x in 0.0f64..=1.0) {
        let bucket = QuantizeScale::flow().bucket(x);
        prop_assert!(bucket == 0.0 || bucket == 0.5 || bucket == 1.0);
    }

    #[test]
    fn prop_ratio_in_unit_range(
        trips in prop::collection::vec(arb_trip(), 0..50),
    ) {
        for t in compute_station_traffic(&stations(), &trips) {
            let ratio = departure_ratio(&t);
            prop_assert!((0.0..=1.0).contains(&ratio));
            if t.total_traffic() == 0 {
                prop_assert_eq!(ratio, 0.5);
            }
        }
    }
}

#[test]
fn morning_trip_scenarios() {
    let stations = stations();
    let trips = vec![Trip {
        ride_id: None,
        bike_type: None,
        is_member: None,
        start_station: StationCode::new("A"),
        end_station: StationCode::new("B"),
        started_at: NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap(),
        ended_at: NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 20, 0)
            .unwrap(),
    }];

    let all = compute_station_traffic(&stations, filter_trips(&trips, TimeFilter::Any));
    assert_eq!((all[0].departures(), all[0].arrivals()), (1, 0));
    assert_eq!((all[1].departures(), all[1].arrivals()), (0, 1));
    assert_eq!(all[0].total_traffic(), 1);
    assert_eq!(all[1].total_traffic(), 1);

    let at_ten = compute_station_traffic(
        &stations,
        filter_trips(&trips, TimeFilter::from_slider(600).unwrap()),
    );
    assert!(at_ten.iter().all(|t| t.total_traffic() == 0));
}
