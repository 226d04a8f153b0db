//! Speed / RPM mapping
//!
//! Speed (mph) = (RPM × tire diameter × π) ÷ (gear ratio × final drive × 336)

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{GearSet, SPEED_CONSTANT};

/// Drivetrain values shared by the speed and performance calculations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivetrainContext {
    /// Final drive ratio (practical range 2.2-6.0)
    pub final_drive: f64,
    /// Engine speed ceiling used for the speed table (5000-12000)
    pub max_rpm: u32,
    /// Tire diameter in inches (15-35)
    pub tire_diameter_inches: f64,
}

impl Default for DrivetrainContext {
    fn default() -> Self {
        Self {
            final_drive: 4.1,
            max_rpm: 7500,
            tire_diameter_inches: 26.0,
        }
    }
}

impl DrivetrainContext {
    /// Road speed in `ratio` at `rpm`
    pub fn speed_at(&self, ratio: f64, rpm: f64) -> f64 {
        speed_at(ratio, self.final_drive, rpm, self.tire_diameter_inches)
    }

    /// Road speed in `ratio` at the RPM ceiling
    pub fn speed_at_max_rpm(&self, ratio: f64) -> f64 {
        self.speed_at(ratio, self.max_rpm as f64)
    }

    /// Engine speed needed to hold `speed_mph` in `ratio`
    pub fn required_rpm(&self, speed_mph: f64, ratio: f64) -> f64 {
        required_rpm(speed_mph, ratio, self.final_drive, self.tire_diameter_inches)
    }
}

/// One row of the speed table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedEntry {
    /// 0-based gear index
    pub gear_index: usize,
    /// Gear ratio
    pub ratio: f64,
    /// Gear ratio × final drive
    pub combined_ratio: f64,
    /// Road speed at the RPM ceiling (mph)
    pub speed_at_max_rpm: f64,
    /// RPM drop when shifting into the next gear, `None` for the top gear
    pub rpm_drop_to_next_gear: Option<f64>,
}

/// A point on a gear's RPM-vs-speed curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    /// Road speed (mph)
    pub speed_mph: f64,
    /// Engine speed at that road speed
    pub rpm: f64,
}

/// Where a shift at the RPM ceiling lands in the next gear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPoint {
    /// 0-based index of the gear being shifted out of
    pub from_gear: usize,
    /// Road speed at the shift (mph)
    pub speed_mph: f64,
    /// Engine speed after the shift
    pub rpm_after_shift: f64,
}

/// Road speed (mph) for a gear at a given engine speed
pub fn speed_at(ratio: f64, final_drive: f64, rpm: f64, tire_diameter_inches: f64) -> f64 {
    let combined_ratio = ratio * final_drive;
    (rpm * tire_diameter_inches * PI) / (combined_ratio * SPEED_CONSTANT)
}

/// Engine speed needed to reach `speed_mph` in a gear; inverse of [`speed_at`]
pub fn required_rpm(speed_mph: f64, ratio: f64, final_drive: f64, tire_diameter_inches: f64) -> f64 {
    let combined_ratio = ratio * final_drive;
    (speed_mph * combined_ratio * SPEED_CONSTANT) / (tire_diameter_inches * PI)
}

/// Percentage RPM drop when shifting from `ratio` into `next_ratio`
pub fn rpm_drop_percent(ratio: f64, next_ratio: f64) -> f64 {
    (1.0 - next_ratio / ratio) * 100.0
}

/// Build the speed table for a gear set
pub fn speed_table(gears: &GearSet, ctx: &DrivetrainContext) -> Vec<SpeedEntry> {
    let ratios = gears.ratios();
    ratios
        .iter()
        .enumerate()
        .map(|(gear_index, &ratio)| SpeedEntry {
            gear_index,
            ratio,
            combined_ratio: ratio * ctx.final_drive,
            speed_at_max_rpm: ctx.speed_at_max_rpm(ratio),
            rpm_drop_to_next_gear: ratios
                .get(gear_index + 1)
                .map(|&next| rpm_drop_percent(ratio, next)),
        })
        .collect()
}

/// Sweep road speed from 0 to `max_speed` and return the points a gear can
/// reach without exceeding the RPM ceiling
pub fn gear_curve(
    ratio: f64,
    ctx: &DrivetrainContext,
    max_speed: f64,
    steps: usize,
) -> Vec<CurvePoint> {
    let steps = steps.max(1);
    let ceiling = ctx.max_rpm as f64;

    (0..=steps)
        .map(|step| max_speed * step as f64 / steps as f64)
        .map(|speed_mph| CurvePoint {
            speed_mph,
            rpm: ctx.required_rpm(speed_mph, ratio),
        })
        .take_while(|point| point.rpm <= ceiling)
        .collect()
}

/// Shift points for every gear except the top one
pub fn shift_points(gears: &GearSet, ctx: &DrivetrainContext) -> Vec<ShiftPoint> {
    gears
        .ratios()
        .windows(2)
        .enumerate()
        .map(|(from_gear, pair)| {
            let speed_mph = ctx.speed_at_max_rpm(pair[0]);
            ShiftPoint {
                from_gear,
                speed_mph,
                rpm_after_shift: ctx.required_rpm(speed_mph, pair[1]),
            }
        })
        .collect()
}

/// Speed axis limit for charts: the fastest speed plus 10% headroom
pub fn chart_max_speed(speeds: &[f64]) -> f64 {
    speeds.iter().copied().fold(0.0, f64::max) * 1.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_at_reference_value() {
        // (7500 × 26 × π) / (4.1 × 336) ≈ 444.7
        let speed = speed_at(1.0, 4.1, 7500.0, 26.0);
        assert!((speed - 444.7).abs() < 0.1, "got {speed}");
    }

    #[test]
    fn test_rpm_drop_percent() {
        assert!((rpm_drop_percent(2.0, 1.5) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_table_last_gear_has_no_drop() {
        let gears = GearSet::from(vec![3.5, 2.0, 1.0]);
        let table = speed_table(&gears, &DrivetrainContext::default());

        assert_eq!(table.len(), 3);
        assert!(table[0].rpm_drop_to_next_gear.is_some());
        assert!(table[2].rpm_drop_to_next_gear.is_none());
        assert!((table[1].combined_ratio - 8.2).abs() < 1e-9);
    }

    #[test]
    fn test_gear_curve_stops_at_ceiling() {
        let ctx = DrivetrainContext::default();
        let top = ctx.speed_at_max_rpm(2.0);
        let curve = gear_curve(2.0, &ctx, top * 2.0, 200);

        assert_eq!(curve.first().map(|p| p.speed_mph), Some(0.0));
        assert!(curve.iter().all(|p| p.rpm <= 7500.0));
        assert!(curve.last().map(|p| p.speed_mph).unwrap_or(0.0) <= top + 1e-9);
        assert!(curve.len() > 90 && curve.len() <= 101);
    }

    #[test]
    fn test_shift_points_land_below_ceiling() {
        let gears = GearSet::from(vec![3.5, 2.0, 1.4, 1.0]);
        let ctx = DrivetrainContext::default();
        let points = shift_points(&gears, &ctx);

        assert_eq!(points.len(), 3);
        // 7500 × 2.0 / 3.5
        assert!((points[0].rpm_after_shift - 7500.0 * 2.0 / 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_chart_max_speed_headroom() {
        assert!((chart_max_speed(&[50.0, 100.0]) - 110.0).abs() < 1e-9);
        assert_eq!(chart_max_speed(&[]), 0.0);
    }
}
