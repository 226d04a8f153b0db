//! Saved Configurations
//!
//! Named, timestamped snapshots of the calculator, the stores that persist them
//! and the side-by-side comparison built from them.
//!
//! A snapshot is never mutated after it is captured; it is only created by an
//! explicit save and removed by an explicit delete.

mod compare;
mod error;
mod selection;
mod store;

pub use compare::{
    compare, comparison_curves, ComparisonColumn, ComparisonRow, ComparisonTable, ConfigCurves,
    GearCell, GearRow, MAX_COMPARED,
};
pub use error::StoreError;
pub use selection::ComparisonSelection;
pub use store::{ConfigStore, JsonConfigStore, MemoryConfigStore, CONFIGS_FILE_NAME};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculator::{CalculatorInputs, Derived};
use crate::gearing::{DrivetrainContext, GearSet, GearSetParameters};
use crate::performance::{PerformanceEstimate, VehicleSpec};

/// Colors handed out to saved configurations, in order of preference
pub const CONFIG_COLORS: &[&str] = &[
    "#ef4444", // red
    "#f97316", // orange
    "#eab308", // yellow
    "#22c55e", // green
    "#06b6d4", // cyan
    "#8b5cf6", // violet
    "#ec4899", // pink
    "#14b8a6", // teal
];

/// A saved calculator snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedConfiguration {
    /// Unique id (UUID v4)
    pub id: String,
    /// User-given name
    pub name: String,
    /// Car model
    pub car: String,
    /// When the snapshot was taken
    pub created_at: DateTime<Utc>,
    /// Generator inputs
    pub parameters: GearSetParameters,
    /// Final drive, RPM ceiling and tire size
    pub drivetrain: DrivetrainContext,
    /// Weight, power and torque
    pub vehicle: VehicleSpec,
    /// Gear ratios as they were when saved (may include hand edits)
    pub gears: GearSet,
    /// Estimate computed at save time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceEstimate>,
    /// Display color (hex)
    pub color: String,
}

impl SavedConfiguration {
    /// Capture the current calculator state under `name`.
    ///
    /// `existing` is used to pick a color that is not already taken.
    pub fn capture(
        name: &str,
        inputs: &CalculatorInputs,
        derived: &Derived,
        existing: &[SavedConfiguration],
    ) -> Result<Self, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            car: inputs.car.clone(),
            created_at: Utc::now(),
            parameters: inputs.parameters,
            drivetrain: inputs.drivetrain,
            vehicle: inputs.vehicle,
            gears: derived.gears.clone(),
            performance: Some(derived.performance),
            color: next_color(existing),
        })
    }

    /// Configured number of gears
    pub fn gear_count(&self) -> usize {
        self.parameters.gear_count
    }

    /// Speed at this configuration's own RPM ceiling in gear `index`
    pub fn speed_for_gear(&self, index: usize) -> Option<f64> {
        self.gears
            .get(index)
            .map(|ratio| self.drivetrain.speed_at_max_rpm(ratio))
    }

    /// Speed at the RPM ceiling in the top gear
    pub fn top_gear_speed(&self) -> Option<f64> {
        self.gears
            .top()
            .map(|ratio| self.drivetrain.speed_at_max_rpm(ratio))
    }

    /// Calculator inputs to restore this snapshot into the calculator
    pub fn to_inputs(&self) -> CalculatorInputs {
        CalculatorInputs {
            car: self.car.clone(),
            parameters: self.parameters,
            drivetrain: self.drivetrain,
            vehicle: self.vehicle,
        }
    }

    /// Load this snapshot back into the calculator.
    ///
    /// The saved gear set is used as-is, so hand edits survive; the speed
    /// table and estimate are recomputed from it.
    pub fn restore(&self) -> (CalculatorInputs, Derived) {
        let inputs = self.to_inputs();
        let derived = Derived::recompute_with_gears(&inputs, self.gears.clone());
        (inputs, derived)
    }
}

/// First palette color not used by `existing`, or cycle through the palette
pub fn next_color(existing: &[SavedConfiguration]) -> String {
    CONFIG_COLORS
        .iter()
        .find(|color| !existing.iter().any(|c| c.color == **color))
        .unwrap_or(&CONFIG_COLORS[existing.len() % CONFIG_COLORS.len()])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::recompute;

    fn capture(name: &str, existing: &[SavedConfiguration]) -> SavedConfiguration {
        let inputs = CalculatorInputs::default();
        SavedConfiguration::capture(name, &inputs, &recompute(&inputs), existing).unwrap()
    }

    #[test]
    fn test_capture_rejects_blank_name() {
        let inputs = CalculatorInputs::default();
        let result = SavedConfiguration::capture("   ", &inputs, &recompute(&inputs), &[]);
        assert!(matches!(result, Err(StoreError::EmptyName)));
    }

    #[test]
    fn test_colors_skip_used_ones() {
        let first = capture("A", &[]);
        assert_eq!(first.color, "#ef4444");

        let second = capture("B", std::slice::from_ref(&first));
        assert_eq!(second.color, "#f97316");
    }

    #[test]
    fn test_colors_cycle_when_palette_exhausted() {
        let mut saved = Vec::new();
        for i in 0..CONFIG_COLORS.len() {
            let config = capture(&format!("C{i}"), &saved);
            saved.push(config);
        }
        // 8 used, 8 % 8 = 0
        assert_eq!(next_color(&saved), CONFIG_COLORS[0]);
    }

    #[test]
    fn test_capture_keeps_estimate_and_trims_name() {
        let config = capture("  Drag setup ", &[]);
        assert_eq!(config.name, "Drag setup");
        assert!(config.performance.is_some());
        assert_eq!(config.to_inputs(), CalculatorInputs::default());
    }

    #[test]
    fn test_restore_keeps_hand_edited_gears() {
        let mut config = capture("Edited", &[]);
        config.gears = config.gears.with_ratio(2, 1.3);

        let (inputs, derived) = config.restore();
        assert_eq!(inputs, CalculatorInputs::default());
        assert_eq!(derived.gears.ratios()[2], 1.3);
        assert_ne!(derived.gears, recompute(&inputs).gears);
        assert_eq!(derived.speed_table[2].ratio, 1.3);
        assert_eq!(Some(derived.performance), config.performance);
    }
}
