//! Gearing
//!
//! Gear set generation and the speed/RPM mapping used by the ratio calculator.
//!
//! Everything here is a pure function of its arguments: the caller owns the
//! parameters and regenerates derived values whenever one of them changes.

mod generator;
mod speed;

pub use generator::{generate_gear_set, GearSet, GearSetParameters};
pub use speed::{
    chart_max_speed, gear_curve, required_rpm, rpm_drop_percent, shift_points, speed_at,
    speed_table, CurvePoint, DrivetrainContext, ShiftPoint, SpeedEntry,
};

/// Inches-per-mile / minutes-per-hour conversion used by the speed formula.
///
/// Saved configurations were computed with exactly this value, so it must not
/// be replaced by the "precise" 336.13.
pub const SPEED_CONSTANT: f64 = 336.0;

/// Ratio of the top gear (direct drive)
pub const DIRECT_DRIVE: f64 = 1.0;

/// Number of sweep steps used for gear curves
pub const DEFAULT_CURVE_STEPS: usize = 200;
