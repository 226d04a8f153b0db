//! Reaction-Time Trainer
//!
//! Models a drag-racing "Christmas tree" start light and scores a single
//! reaction against it.
//!
//! - [`ChristmasTree`] is the state machine. It is driven with explicit
//!   instants and has no timers of its own.
//! - [`ReactionSequencer`] owns the tokio tasks that fire the lamp transitions
//!   and publishes [`SequencerEvent`]s for renderers and the leaderboard.
//! - [`Leaderboard`] is the collaborator that accepts eligible scores.
//!
//! ```text
//! Idle -> Armed -> Measuring -> Scored
//!            \-------------> Fouled
//! ```

mod leaderboard;
mod sequencer;
mod tree;

pub use leaderboard::{
    Leaderboard, LeaderboardEntry, LeaderboardError, MemoryLeaderboard, DEFAULT_TOP_LIMIT,
};
pub use sequencer::{ReactionSequencer, SequencerEvent};
pub use tree::{ChristmasTree, TreeSnapshot};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reactions up to this many milliseconds after green are perfect
pub const PERFECT_WINDOW_MS: f64 = 50.0;

/// Value recorded for a red light
pub const FOUL_VALUE_SECONDS: f64 = 0.0;

/// Number of lamps on the tree
pub const LAMP_COUNT: usize = 6;

/// Lamp positions on the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Lamp {
    /// First amber
    Amber1,
    /// Second amber
    Amber2,
    /// Third amber
    Amber3,
    /// Green on a good start, red on a foul
    Go,
    /// Pre-stage beams
    PreStage,
    /// Stage beams
    Stage,
}

impl Lamp {
    /// All lamps in index order
    pub const ALL: [Lamp; LAMP_COUNT] = [
        Lamp::Amber1,
        Lamp::Amber2,
        Lamp::Amber3,
        Lamp::Go,
        Lamp::PreStage,
        Lamp::Stage,
    ];

    /// The three countdown ambers
    pub const AMBERS: [Lamp; 3] = [Lamp::Amber1, Lamp::Amber2, Lamp::Amber3];

    /// Position in the lamp array
    pub fn index(self) -> usize {
        match self {
            Lamp::Amber1 => 0,
            Lamp::Amber2 => 1,
            Lamp::Amber3 => 2,
            Lamp::Go => 3,
            Lamp::PreStage => 4,
            Lamp::Stage => 5,
        }
    }
}

/// What a lamp is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LampState {
    /// Dark
    #[default]
    Off,
    /// Countdown amber
    Amber,
    /// Go
    Green,
    /// Foul
    Red,
}

/// Phase of a start sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreePhase {
    /// Nothing running
    #[default]
    Idle,
    /// Lamps counting down, green not yet shown
    Armed,
    /// Green is on, waiting for the reaction
    Measuring,
    /// Reaction recorded after green
    Scored,
    /// Reaction came before green (red light)
    Fouled,
}

impl TreePhase {
    /// True once the sequence has an outcome
    pub fn is_terminal(self) -> bool {
        matches!(self, TreePhase::Scored | TreePhase::Fouled)
    }
}

/// How a reaction is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Within the perfect window after green
    Perfect,
    /// Before green
    Early,
    /// Slower than the perfect window
    Late,
}

impl Classification {
    /// Lowercase name, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Perfect => "perfect",
            Classification::Early => "early",
            Classification::Late => "late",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a reaction measured after green.
///
/// 0-50 ms is perfect, anything slower is late; there is no upper bound.
pub fn classify(reaction_ms: f64) -> Classification {
    if (0.0..=PERFECT_WINDOW_MS).contains(&reaction_ms) {
        Classification::Perfect
    } else {
        Classification::Late
    }
}

/// One finished sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionLogEntry {
    /// Sequence number within the log, starting at 1
    pub id: u32,
    /// When the sequence finished
    pub timestamp: DateTime<Utc>,
    /// Reaction time in seconds, [`FOUL_VALUE_SECONDS`] for a red light
    pub measured_value_seconds: f64,
    /// Outcome
    pub classification: Classification,
}

impl ReactionLogEntry {
    /// Reaction time in milliseconds
    pub fn measured_ms(&self) -> f64 {
        self.measured_value_seconds * 1000.0
    }

    /// Whether this result may be submitted to the leaderboard
    pub fn is_leaderboard_eligible(&self) -> bool {
        self.classification == Classification::Perfect
    }

    /// Feedback line shown after a run
    pub fn feedback(&self) -> String {
        match self.classification {
            Classification::Early => "RED LIGHT! (-0.000)".to_string(),
            Classification::Perfect => format!("PERFECT! (+{:.3}s)", self.measured_value_seconds),
            Classification::Late => format!("TOO LATE! (+{:.3}s)", self.measured_value_seconds),
        }
    }
}

/// A scheduled change on the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeStep {
    /// Light one lamp amber
    Light(Lamp),
    /// Ambers off, go lamp green, start measuring
    Green,
}

/// Fixed lamp schedules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreeTiming {
    /// Pre-stage, stage, three ambers, then green at 3.5 s
    #[default]
    Full,
    /// Three ambers, then green at 2.0 s
    Simple,
}

const FULL_SCHEDULE: &[(u64, TreeStep)] = &[
    (500, TreeStep::Light(Lamp::PreStage)),
    (1500, TreeStep::Light(Lamp::Stage)),
    (2000, TreeStep::Light(Lamp::Amber1)),
    (2500, TreeStep::Light(Lamp::Amber2)),
    (3000, TreeStep::Light(Lamp::Amber3)),
    (3500, TreeStep::Green),
];

const SIMPLE_SCHEDULE: &[(u64, TreeStep)] = &[
    (500, TreeStep::Light(Lamp::Amber1)),
    (1000, TreeStep::Light(Lamp::Amber2)),
    (1500, TreeStep::Light(Lamp::Amber3)),
    (2000, TreeStep::Green),
];

impl TreeTiming {
    /// Steps with their offsets from sequence start, in firing order
    pub fn schedule(&self) -> impl Iterator<Item = (Duration, TreeStep)> {
        let steps = match self {
            TreeTiming::Full => FULL_SCHEDULE,
            TreeTiming::Simple => SIMPLE_SCHEDULE,
        };
        steps
            .iter()
            .map(|&(offset_ms, step)| (Duration::from_millis(offset_ms), step))
    }

    /// Offset of the green light from sequence start
    pub fn green_offset(&self) -> Duration {
        self.schedule()
            .find(|(_, step)| *step == TreeStep::Green)
            .map(|(offset, _)| offset)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bounds() {
        assert_eq!(classify(0.0), Classification::Perfect);
        assert_eq!(classify(50.0), Classification::Perfect);
        assert_eq!(classify(50.001), Classification::Late);
        assert_eq!(classify(60_000.0), Classification::Late);
    }

    #[test]
    fn test_schedules_end_with_green() {
        assert_eq!(TreeTiming::Full.green_offset(), Duration::from_millis(3500));
        assert_eq!(TreeTiming::Simple.green_offset(), Duration::from_millis(2000));
        assert_eq!(TreeTiming::Full.schedule().count(), 6);
    }

    #[test]
    fn test_lamp_indices_are_unique() {
        let mut seen = [false; LAMP_COUNT];
        for lamp in Lamp::ALL {
            assert!(!seen[lamp.index()]);
            seen[lamp.index()] = true;
        }
    }
}
