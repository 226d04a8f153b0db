//! Tests for the performance estimator

use racetools_core::performance::{estimate_performance, RaceDistance, VehicleSpec};

fn within(value: f64, min: f64, max: f64) -> bool {
    (min..=max).contains(&value)
}

#[test]
fn test_estimates_stay_in_bands_for_extreme_inputs() {
    let vehicles = [
        VehicleSpec::new(1.0, 100_000.0, 0.0),
        VehicleSpec::new(100_000.0, 1.0, 100_000.0),
        VehicleSpec::new(3200.0, 0.0, 0.0),
        VehicleSpec::new(500.0, 2000.0, 2000.0),
    ];
    for vehicle in &vehicles {
        for final_drive in [0.1, 2.2, 4.1, 6.0, 50.0] {
            let est = estimate_performance(final_drive, vehicle);
            assert!(within(est.quarter_mile_time_sec, 9.0, 16.0), "{est:?}");
            assert!(within(est.quarter_mile_speed_mph, 80.0, 160.0), "{est:?}");
            assert!(within(est.half_mile_time_sec, 14.0, 25.0), "{est:?}");
            assert!(within(est.half_mile_speed_mph, 100.0, 200.0), "{est:?}");
        }
    }
}

#[test]
fn test_more_power_is_never_slower() {
    let base = estimate_performance(4.1, &VehicleSpec::new(3200.0, 210.0, 214.0));
    let tuned = estimate_performance(4.1, &VehicleSpec::new(3200.0, 300.0, 214.0));

    assert!(tuned.quarter_mile_time_sec < base.quarter_mile_time_sec);
    assert!(tuned.quarter_mile_speed_mph > base.quarter_mile_speed_mph);
}

#[test]
fn test_distance_lookup() {
    let est = estimate_performance(4.1, &VehicleSpec::default());
    assert_eq!(
        est.at(RaceDistance::HalfMile),
        (est.half_mile_time_sec, est.half_mile_speed_mph)
    );
    assert_eq!(RaceDistance::QuarterMile.feet(), 1320.0);
}
