//! Ratio calculator state
//!
//! The calculator's inputs live in one owned struct. Derived values (gear set,
//! speed table, performance estimate) are produced by an explicit [`recompute`]
//! call that the caller makes whenever any input changes.

use serde::{Deserialize, Serialize};

use crate::gearing::{speed_table, DrivetrainContext, GearSet, GearSetParameters, SpeedEntry};
use crate::performance::{estimate_performance, PerformanceEstimate, VehicleSpec};
use crate::vehicle::{car_slug, default_spec_for, DEFAULT_CAR};

/// Everything the user can adjust in the ratio calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInputs {
    /// Selected car model
    pub car: String,
    /// Gear set generator inputs
    pub parameters: GearSetParameters,
    /// Final drive, RPM ceiling and tire size
    pub drivetrain: DrivetrainContext,
    /// Weight, power and torque
    pub vehicle: VehicleSpec,
}

impl Default for CalculatorInputs {
    fn default() -> Self {
        Self {
            car: DEFAULT_CAR.to_string(),
            parameters: GearSetParameters::default(),
            drivetrain: DrivetrainContext::default(),
            vehicle: default_spec_for(DEFAULT_CAR),
        }
    }
}

impl CalculatorInputs {
    /// Switch car and apply that car's default vehicle spec
    pub fn select_car(&mut self, car: &str) {
        self.car = car.to_string();
        self.vehicle = default_spec_for(car);
    }
}

/// Values derived from [`CalculatorInputs`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Derived {
    /// Generated or hand-edited gear set
    pub gears: GearSet,
    /// One entry per gear
    pub speed_table: Vec<SpeedEntry>,
    /// Quarter- and half-mile estimate
    pub performance: PerformanceEstimate,
}

impl Derived {
    /// Recompute against a hand-edited gear set instead of a generated one
    pub fn recompute_with_gears(inputs: &CalculatorInputs, gears: GearSet) -> Self {
        let speed_table = speed_table(&gears, &inputs.drivetrain);
        let performance = estimate_performance(inputs.drivetrain.final_drive, &inputs.vehicle);
        Self {
            gears,
            speed_table,
            performance,
        }
    }
}

/// Regenerate the gear set and everything derived from the inputs
pub fn recompute(inputs: &CalculatorInputs) -> Derived {
    Derived::recompute_with_gears(inputs, inputs.parameters.generate())
}

/// Export document for the current calculator state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    /// Car model
    pub car: String,
    /// Final drive ratio
    pub final_drive: f64,
    /// Gear ratios, first gear first
    pub gears: Vec<f64>,
    /// RPM ceiling
    pub rpm: u32,
    /// Tire diameter (inches)
    pub tire_size: f64,
    /// Weight (lb)
    pub car_weight: f64,
    /// Power (hp)
    pub car_power: f64,
    /// Torque (lb-ft)
    pub car_torque: f64,
    /// Estimate at export time
    pub performance: PerformanceEstimate,
    /// Speed at max RPM for each gear (mph)
    pub speeds: Vec<f64>,
}

impl ExportData {
    /// Build the export from inputs and their derived values
    pub fn new(inputs: &CalculatorInputs, derived: &Derived) -> Self {
        Self {
            car: inputs.car.clone(),
            final_drive: inputs.drivetrain.final_drive,
            gears: derived.gears.ratios().to_vec(),
            rpm: inputs.drivetrain.max_rpm,
            tire_size: inputs.drivetrain.tire_diameter_inches,
            car_weight: inputs.vehicle.weight_lb,
            car_power: inputs.vehicle.power_hp,
            car_torque: inputs.vehicle.torque_lb_ft,
            performance: derived.performance,
            speeds: derived.speed_table.iter().map(|e| e.speed_at_max_rpm).collect(),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Suggested file name, e.g. `1999-mitsubishi-eclipse-gsx-ratios.json`
    pub fn file_name(&self) -> String {
        format!("{}-ratios.json", car_slug(&self.car))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recompute_defaults() {
        let inputs = CalculatorInputs::default();
        let derived = recompute(&inputs);

        assert_eq!(derived.gears.len(), 5);
        assert_eq!(derived.speed_table.len(), 5);
        assert_eq!(
            derived.performance,
            estimate_performance(4.1, &VehicleSpec::new(3200.0, 210.0, 214.0))
        );
    }

    #[test]
    fn test_select_car_applies_defaults() {
        let mut inputs = CalculatorInputs::default();
        inputs.select_car("2004 Chevrolet Corvette Z06");
        assert_eq!(inputs.vehicle.power_hp, 400.0);
    }

    #[test]
    fn test_export_file_name() {
        let inputs = CalculatorInputs::default();
        let export = ExportData::new(&inputs, &recompute(&inputs));
        assert_eq!(export.file_name(), "1999-mitsubishi-eclipse-gsx-ratios.json");
        assert_eq!(export.speeds.len(), 5);
    }
}
