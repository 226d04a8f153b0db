//! # RaceTools Core Library
//!
//! Core functionality for the RaceTools drag-racing toolkit.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Gear set generation from a first-gear ratio and spread factor
//! - Speed/RPM mapping for a drivetrain (speed tables, curves, shift points)
//! - Quarter- and half-mile performance estimates
//! - Saved configurations, persistence and side-by-side comparison
//! - A Christmas-tree reaction-time trainer with a leaderboard
//! - Bracket racing dial-in judging
//! - Suspension tunes with community presets and JSON export
//!
//! ## Example
//!
//! ```rust
//! use racetools_core::calculator::{recompute, CalculatorInputs};
//!
//! let inputs = CalculatorInputs::default();
//! let derived = recompute(&inputs);
//!
//! assert_eq!(derived.gears.len(), 5);
//! assert!(derived.performance.quarter_mile_time_sec > 9.0);
//! ```

pub mod bracket;
pub mod calculator;
pub mod configs;
pub mod gearing;
pub mod performance;
pub mod reaction;
pub mod settings;
pub mod tuning;
pub mod vehicle;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bracket::{judge_run, DialInVerdict, RunLog, RunLogEntry};
    pub use crate::calculator::{recompute, CalculatorInputs, Derived, ExportData};
    pub use crate::configs::{
        compare, ComparisonSelection, ComparisonTable, ConfigStore, JsonConfigStore,
        MemoryConfigStore, SavedConfiguration, StoreError,
    };
    pub use crate::gearing::{
        generate_gear_set, speed_at, speed_table, DrivetrainContext, GearSet, GearSetParameters,
    };
    pub use crate::performance::{estimate_performance, PerformanceEstimate, VehicleSpec};
    pub use crate::reaction::{
        ChristmasTree, Classification, Leaderboard, MemoryLeaderboard, ReactionLogEntry,
        ReactionSequencer, SequencerEvent, TreePhase, TreeTiming,
    };
    pub use crate::settings::AppSettings;
    pub use crate::tuning::{Tune, TuneLibrary, TuneSettings, COMMUNITY_TUNES};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
