//! Performance Estimator
//!
//! Closed-form quarter-mile / half-mile estimate from power-to-weight and final
//! drive. This is a UI-facing heuristic, not a physics model: no torque curve,
//! no traction limit and no drag. The coefficients and clamps are fixed so
//! estimates stay comparable with previously saved configurations.
//!
//! Note that neither the gear set nor torque enters the formula; only the final
//! drive and power-to-weight do.

use serde::{Deserialize, Serialize};

/// Baseline quarter-mile elapsed time (s)
const BASE_QUARTER_TIME: f64 = 12.5;
/// Baseline quarter-mile trap speed (mph)
const BASE_QUARTER_SPEED: f64 = 100.0;
/// Half-mile time relative to quarter-mile time
const HALF_TIME_FACTOR: f64 = 1.6;
/// Half-mile speed relative to quarter-mile speed
const HALF_SPEED_FACTOR: f64 = 1.3;

const QUARTER_TIME_RANGE: (f64, f64) = (9.0, 16.0);
const QUARTER_SPEED_RANGE: (f64, f64) = (80.0, 160.0);
const HALF_TIME_RANGE: (f64, f64) = (14.0, 25.0);
const HALF_SPEED_RANGE: (f64, f64) = (100.0, 200.0);

/// Vehicle mass and output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSpec {
    /// Curb weight in pounds (1500-5000)
    pub weight_lb: f64,
    /// Peak power in hp (100-1000)
    pub power_hp: f64,
    /// Peak torque in lb-ft (100-1000)
    pub torque_lb_ft: f64,
}

impl Default for VehicleSpec {
    fn default() -> Self {
        Self {
            weight_lb: 3200.0,
            power_hp: 210.0,
            torque_lb_ft: 214.0,
        }
    }
}

impl VehicleSpec {
    /// Create a vehicle spec
    pub fn new(weight_lb: f64, power_hp: f64, torque_lb_ft: f64) -> Self {
        Self {
            weight_lb,
            power_hp,
            torque_lb_ft,
        }
    }

    /// Power-to-weight ratio (hp per lb)
    pub fn power_to_weight(&self) -> f64 {
        self.power_hp / self.weight_lb
    }

    /// Torque-to-weight ratio (lb-ft per lb)
    pub fn torque_to_weight(&self) -> f64 {
        self.torque_lb_ft / self.weight_lb
    }
}

/// Race distances the estimator reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RaceDistance {
    /// 1320 ft
    QuarterMile,
    /// 2640 ft
    HalfMile,
}

impl RaceDistance {
    /// Length in feet
    pub fn feet(&self) -> f64 {
        match self {
            RaceDistance::QuarterMile => 1320.0,
            RaceDistance::HalfMile => 2640.0,
        }
    }

    /// Short label for tables
    pub fn label(&self) -> &'static str {
        match self {
            RaceDistance::QuarterMile => "1/4 Mile",
            RaceDistance::HalfMile => "1/2 Mile",
        }
    }
}

/// Estimated elapsed times and trap speeds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEstimate {
    /// Quarter-mile elapsed time, 9-16 s
    pub quarter_mile_time_sec: f64,
    /// Quarter-mile trap speed, 80-160 mph
    pub quarter_mile_speed_mph: f64,
    /// Half-mile elapsed time, 14-25 s
    pub half_mile_time_sec: f64,
    /// Half-mile trap speed, 100-200 mph
    pub half_mile_speed_mph: f64,
}

impl PerformanceEstimate {
    /// Elapsed time (s) and trap speed (mph) for a distance
    pub fn at(&self, distance: RaceDistance) -> (f64, f64) {
        match distance {
            RaceDistance::QuarterMile => (self.quarter_mile_time_sec, self.quarter_mile_speed_mph),
            RaceDistance::HalfMile => (self.half_mile_time_sec, self.half_mile_speed_mph),
        }
    }
}

/// Estimate quarter-mile and half-mile performance
///
/// Each output is clamped to its band independently. The half-mile values are
/// derived from the unclamped quarter-mile values.
pub fn estimate_performance(final_drive: f64, vehicle: &VehicleSpec) -> PerformanceEstimate {
    let power_to_weight = vehicle.power_to_weight();

    let quarter_time = BASE_QUARTER_TIME - power_to_weight * 10.0 + final_drive / 10.0;
    let quarter_speed = BASE_QUARTER_SPEED + power_to_weight * 100.0 - final_drive * 2.0;

    let half_time = quarter_time * HALF_TIME_FACTOR;
    let half_speed = quarter_speed * HALF_SPEED_FACTOR;

    PerformanceEstimate {
        quarter_mile_time_sec: clamp_to(quarter_time, QUARTER_TIME_RANGE),
        quarter_mile_speed_mph: clamp_to(quarter_speed, QUARTER_SPEED_RANGE),
        half_mile_time_sec: clamp_to(half_time, HALF_TIME_RANGE),
        half_mile_speed_mph: clamp_to(half_speed, HALF_SPEED_RANGE),
    }
}

/// Clamp that keeps NaN as NaN (non-finite input is the caller's problem)
fn clamp_to(value: f64, (min, max): (f64, f64)) -> f64 {
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_car_estimate() {
        // 210 hp / 3200 lb, final drive 4.1
        let est = estimate_performance(4.1, &VehicleSpec::default());
        let p2w = 210.0 / 3200.0;

        assert!((est.quarter_mile_time_sec - (12.5 - p2w * 10.0 + 0.41)).abs() < 1e-9);
        assert!((est.quarter_mile_speed_mph - (100.0 + p2w * 100.0 - 8.2)).abs() < 1e-9);
        assert!((est.half_mile_time_sec - (12.5 - p2w * 10.0 + 0.41) * 1.6).abs() < 1e-9);
        // 98.36 × 1.3 = 127.9
        assert!((est.half_mile_speed_mph - (100.0 + p2w * 100.0 - 8.2) * 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_inputs_are_clamped() {
        let est = estimate_performance(4.1, &VehicleSpec::new(1.0, 100_000.0, 100.0));
        assert_eq!(est.quarter_mile_time_sec, 9.0);
        assert_eq!(est.quarter_mile_speed_mph, 160.0);
        assert_eq!(est.half_mile_time_sec, 14.0);
        assert_eq!(est.half_mile_speed_mph, 200.0);
    }

    #[test]
    fn test_torque_does_not_change_estimate() {
        let a = estimate_performance(3.9, &VehicleSpec::new(3000.0, 300.0, 200.0));
        let b = estimate_performance(3.9, &VehicleSpec::new(3000.0, 300.0, 900.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_at_distance() {
        let est = estimate_performance(4.1, &VehicleSpec::default());
        assert_eq!(est.at(RaceDistance::HalfMile).0, est.half_mile_time_sec);
        assert_eq!(RaceDistance::QuarterMile.feet(), 1320.0);
    }
}
