//! Configuration comparator
//!
//! Aligns saved configurations by gear index for side-by-side inspection.
//! Every configuration is evaluated at its own RPM ceiling, final drive and
//! tire size; nothing is normalized to a common baseline.

use serde::{Deserialize, Serialize};

use super::SavedConfiguration;
use crate::gearing::{chart_max_speed, gear_curve, CurvePoint};
use crate::performance::RaceDistance;

/// Maximum number of configurations compared at once
pub const MAX_COMPARED: usize = 4;

/// Column header for one compared configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonColumn {
    /// Saved configuration id
    pub id: String,
    /// Configuration name
    pub name: String,
    /// Car model
    pub car: String,
    /// Display color (hex)
    pub color: String,
}

/// Ratio and speed of one gear in one configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearCell {
    /// Gear ratio
    pub ratio: f64,
    /// Speed at the configuration's RPM ceiling (mph)
    pub speed_mph: f64,
}

/// One gear across all compared configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearRow {
    /// Zero-based gear index
    pub gear_index: usize,
    /// `None` where the configuration has no gear at this index
    pub cells: Vec<Option<GearCell>>,
}

/// Side-by-side comparison table
///
/// Rows are the gear rows followed by final drive, top-gear speed, quarter-mile
/// time and half-mile time. Columns follow the selection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTable {
    /// One column per configuration
    pub columns: Vec<ComparisonColumn>,
    /// As many rows as the largest gear count
    pub gear_rows: Vec<GearRow>,
    /// Final drive per column
    pub final_drive: Vec<f64>,
    /// Top-gear speed at the RPM ceiling per column (mph)
    pub top_gear_speed: Vec<Option<f64>>,
    /// Quarter-mile estimate per column (s), `None` without a stored estimate
    pub quarter_mile_time: Vec<Option<f64>>,
    /// Half-mile estimate per column (s)
    pub half_mile_time: Vec<Option<f64>>,
}

/// A labelled, display-formatted table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Row header
    pub label: String,
    /// One formatted cell per column, `-` where missing
    pub cells: Vec<String>,
}

/// Placeholder for a missing value
const MISSING: &str = "-";

/// Build the comparison table for configurations in selection order.
///
/// Only the first [`MAX_COMPARED`] configurations are used.
pub fn compare(configs: &[SavedConfiguration]) -> ComparisonTable {
    let configs = capped(configs);

    let gear_rows = (0..configs.iter().map(|c| c.gear_count()).max().unwrap_or(0))
        .map(|gear_index| GearRow {
            gear_index,
            cells: configs
                .iter()
                .map(|config| {
                    let ratio = config.gears.get(gear_index)?;
                    Some(GearCell {
                        ratio,
                        speed_mph: config.drivetrain.speed_at_max_rpm(ratio),
                    })
                })
                .collect(),
        })
        .collect();

    ComparisonTable {
        columns: configs
            .iter()
            .map(|c| ComparisonColumn {
                id: c.id.clone(),
                name: c.name.clone(),
                car: c.car.clone(),
                color: c.color.clone(),
            })
            .collect(),
        gear_rows,
        final_drive: configs.iter().map(|c| c.drivetrain.final_drive).collect(),
        top_gear_speed: configs.iter().map(|c| c.top_gear_speed()).collect(),
        quarter_mile_time: configs
            .iter()
            .map(|c| c.performance.map(|p| p.quarter_mile_time_sec))
            .collect(),
        half_mile_time: configs
            .iter()
            .map(|c| c.performance.map(|p| p.half_mile_time_sec))
            .collect(),
    }
}

impl ComparisonTable {
    /// Number of compared configurations
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// All rows formatted for display, in table order
    pub fn rows(&self) -> Vec<ComparisonRow> {
        let mut rows: Vec<ComparisonRow> = self
            .gear_rows
            .iter()
            .map(|row| ComparisonRow {
                label: format!("Gear {}", row.gear_index + 1),
                cells: row
                    .cells
                    .iter()
                    .map(|cell| match cell {
                        Some(cell) => format!("{:.3} ({:.1} mph)", cell.ratio, cell.speed_mph),
                        None => MISSING.to_string(),
                    })
                    .collect(),
            })
            .collect();

        rows.push(ComparisonRow {
            label: "Final Drive".to_string(),
            cells: self.final_drive.iter().map(|fd| format!("{fd:.2}")).collect(),
        });
        rows.push(ComparisonRow {
            label: "Top Speed".to_string(),
            cells: format_optional(&self.top_gear_speed, |s| format!("{s:.1} mph")),
        });
        rows.push(ComparisonRow {
            label: RaceDistance::QuarterMile.label().to_string(),
            cells: format_optional(&self.quarter_mile_time, |t| format!("{t:.2}s")),
        });
        rows.push(ComparisonRow {
            label: RaceDistance::HalfMile.label().to_string(),
            cells: format_optional(&self.half_mile_time, |t| format!("{t:.2}s")),
        });

        rows
    }
}

fn format_optional(values: &[Option<f64>], fmt: impl Fn(f64) -> String) -> Vec<String> {
    values
        .iter()
        .map(|v| v.map(&fmt).unwrap_or_else(|| MISSING.to_string()))
        .collect()
}

fn capped(configs: &[SavedConfiguration]) -> &[SavedConfiguration] {
    if configs.len() > MAX_COMPARED {
        tracing::warn!(
            "Comparing {} configurations, only the first {} are used",
            configs.len(),
            MAX_COMPARED
        );
        &configs[..MAX_COMPARED]
    } else {
        configs
    }
}

/// Gear curves of one configuration on the shared comparison axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigCurves {
    /// Saved configuration id
    pub id: String,
    /// Display color (hex)
    pub color: String,
    /// RPM ceiling the curves stop at
    pub max_rpm: u32,
    /// One curve per gear
    pub curves: Vec<Vec<CurvePoint>>,
}

/// Per-configuration gear curves swept over a common speed axis.
///
/// Returns the axis limit (mph) and the curves.
pub fn comparison_curves(configs: &[SavedConfiguration], steps: usize) -> (f64, Vec<ConfigCurves>) {
    let configs = capped(configs);

    let speeds: Vec<f64> = configs
        .iter()
        .flat_map(|c| (0..c.gears.len()).filter_map(move |i| c.speed_for_gear(i)))
        .collect();
    let max_speed = chart_max_speed(&speeds);

    let curves = configs
        .iter()
        .map(|config| ConfigCurves {
            id: config.id.clone(),
            color: config.color.clone(),
            max_rpm: config.drivetrain.max_rpm,
            curves: config
                .gears
                .iter()
                .map(|ratio| gear_curve(ratio, &config.drivetrain, max_speed, steps))
                .collect(),
        })
        .collect();

    (max_speed, curves)
}
