//! Gear set generator
//!
//! Derives a full set of ratios from the first gear, the number of gears and a
//! spread factor. The top gear is always direct drive.

use serde::{Deserialize, Serialize};

use super::DIRECT_DRIVE;

/// Inputs to the gear set generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearSetParameters {
    /// First gear ratio (the numerically largest ratio)
    pub first_gear: f64,
    /// Number of forward gears (5 or 6)
    pub gear_count: usize,
    /// How far each step undershoots a pure geometric progression (practical range 0.6-0.95)
    pub spread_factor: f64,
}

impl Default for GearSetParameters {
    fn default() -> Self {
        Self {
            first_gear: 3.5,
            gear_count: 5,
            spread_factor: 0.8,
        }
    }
}

impl GearSetParameters {
    /// Generate the gear set for these parameters
    pub fn generate(&self) -> GearSet {
        generate_gear_set(self.first_gear, self.gear_count, self.spread_factor)
    }
}

/// Ordered gear ratios, index 0 is first gear
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GearSet(Vec<f64>);

impl GearSet {
    /// All ratios, first gear first
    pub fn ratios(&self) -> &[f64] {
        &self.0
    }

    /// Number of gears
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the set holds no gears
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ratio of the gear at `index` (0-based)
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Ratio of the top gear
    pub fn top(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// Iterate over the ratios
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Return a copy with one gear replaced by a hand-entered ratio.
    ///
    /// An out-of-range index returns an unchanged copy.
    pub fn with_ratio(&self, index: usize, ratio: f64) -> GearSet {
        let mut gears = self.0.clone();
        if let Some(slot) = gears.get_mut(index) {
            *slot = ratio;
        }
        GearSet(gears)
    }

    /// Consume the set and return the raw ratios
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for GearSet {
    fn from(gears: Vec<f64>) -> Self {
        GearSet(gears)
    }
}

/// Generate a gear set.
///
/// Each intermediate gear is the previous one multiplied by the geometric step
/// that would reach 1.0 from `first_gear` in `gear_count - 1` steps, scaled by
/// `spread_factor`. The recurrence runs at full precision and intermediate
/// gears are reported to 3 decimals. The last gear is exactly 1.0.
///
/// A recurrence value is kept only if, once rounded, it sits below the gear
/// before it and leaves at least 0.001 for every gear still to come. Otherwise
/// the remaining intermediate gears are spaced geometrically between the last
/// kept gear and 1.0, at least 0.001 apart, so the set keeps decreasing into
/// the top gear.
///
/// No input validation is done: `first_gear <= 0` produces non-finite ratios.
pub fn generate_gear_set(first_gear: f64, gear_count: usize, spread_factor: f64) -> GearSet {
    let mut gears = Vec::with_capacity(gear_count.max(1));
    gears.push(first_gear);

    if gear_count < 2 {
        return GearSet(gears);
    }

    let last = gear_count - 1;
    let factor = (1.0 / first_gear).powf(1.0 / last as f64) * spread_factor;

    let mut current = first_gear;
    for index in 1..last {
        let next = current * factor;
        let slots_left = last - index;
        let next_milli = to_milli(next);

        // NaN fails both tests and is passed through
        let undershoots = next_milli < to_milli(DIRECT_DRIVE) + slots_left as f64;
        let not_decreasing = next_milli > to_milli(current) - 1.0;
        if undershoots || not_decreasing {
            fill_towards_direct(&mut gears, current, slots_left);
            break;
        }
        gears.push(next_milli / MILLI);
        current = next;
    }
    gears.push(DIRECT_DRIVE);

    GearSet(gears)
}

const MILLI: f64 = 1000.0;

/// Ratio in whole thousandths
fn to_milli(ratio: f64) -> f64 {
    (ratio * MILLI).round()
}

/// Push `slots` rounded ratios spaced geometrically between `from` and direct
/// drive, each at least 0.001 below the previous and above the next.
fn fill_towards_direct(gears: &mut Vec<f64>, from: f64, slots: usize) {
    let step = (DIRECT_DRIVE / from).powf(1.0 / (slots + 1) as f64);
    let direct = to_milli(DIRECT_DRIVE);
    let mut ratio = from;
    let mut upper = to_milli(from);
    for k in 0..slots {
        ratio *= step;
        let lower = direct + (slots - k) as f64;
        let milli = to_milli(ratio).min(upper - 1.0).max(lower);
        gears.push(milli / MILLI);
        upper = milli;
    }
}
