//! Christmas tree state machine
//!
//! Every mutation takes the current instant explicitly, so the machine can be
//! driven by the tokio sequencer or stepped by hand in tests.

use chrono::Utc;
use serde::Serialize;
use tokio::time::Instant;

use super::{
    classify, Classification, Lamp, LampState, ReactionLogEntry, TreePhase, TreeStep,
    FOUL_VALUE_SECONDS, LAMP_COUNT,
};

/// Observable state of the tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    /// Increments on every start and reset
    pub generation: u64,
    /// Where the sequence is
    pub phase: TreePhase,
    /// Indexed by [`Lamp::index`]
    pub lamps: [LampState; LAMP_COUNT],
    /// Instant green was shown; `None` unless measuring or scored
    #[serde(skip)]
    pub go_at: Option<Instant>,
    /// Outcome of the latest finished sequence
    pub last_result: Option<ReactionLogEntry>,
}

impl TreeSnapshot {
    /// State of one lamp
    pub fn lamp(&self, lamp: Lamp) -> LampState {
        self.lamps[lamp.index()]
    }
}

/// Start-light state machine with its reaction log
#[derive(Debug, Default)]
pub struct ChristmasTree {
    generation: u64,
    phase: TreePhase,
    lamps: [LampState; LAMP_COUNT],
    go_at: Option<Instant>,
    last_result: Option<ReactionLogEntry>,
    /// Most recent first
    log: Vec<ReactionLogEntry>,
    next_id: u32,
}

impl ChristmasTree {
    /// Idle tree with all lamps off
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new sequence. Returns the generation scheduled steps must carry.
    ///
    /// Any earlier sequence is abandoned; its pending steps become stale.
    pub fn start(&mut self) -> u64 {
        self.generation += 1;
        self.phase = TreePhase::Armed;
        self.lamps = [LampState::Off; LAMP_COUNT];
        self.go_at = None;
        self.last_result = None;
        tracing::debug!("Tree armed (generation {})", self.generation);
        self.generation
    }

    /// Return to idle with all lamps off. The log is kept.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = TreePhase::Idle;
        self.lamps = [LampState::Off; LAMP_COUNT];
        self.go_at = None;
        self.last_result = None;
    }

    /// Apply a scheduled step.
    ///
    /// Steps from an older generation, or arriving after the sequence left
    /// `Armed`, are discarded. Returns whether the step changed the tree.
    pub fn apply(&mut self, generation: u64, step: TreeStep, now: Instant) -> bool {
        if generation != self.generation || self.phase != TreePhase::Armed {
            tracing::debug!(
                "Discarding {:?} (generation {}, current {}, phase {:?})",
                step,
                generation,
                self.generation,
                self.phase
            );
            return false;
        }

        match step {
            TreeStep::Light(lamp) => {
                self.lamps[lamp.index()] = LampState::Amber;
            }
            TreeStep::Green => {
                for lamp in Lamp::AMBERS {
                    self.lamps[lamp.index()] = LampState::Off;
                }
                self.lamps[Lamp::Go.index()] = LampState::Green;
                self.go_at = Some(now);
                self.phase = TreePhase::Measuring;
            }
        }
        true
    }

    /// Register the user's reaction.
    ///
    /// Before green this is a foul; after green the delay is scored. In any
    /// other phase the reaction is ignored and `None` is returned.
    pub fn react(&mut self, now: Instant) -> Option<ReactionLogEntry> {
        let (value, classification) = match self.phase {
            TreePhase::Armed => {
                for lamp in Lamp::AMBERS {
                    self.lamps[lamp.index()] = LampState::Off;
                }
                self.lamps[Lamp::Go.index()] = LampState::Red;
                self.go_at = None;
                self.phase = TreePhase::Fouled;
                (FOUL_VALUE_SECONDS, Classification::Early)
            }
            TreePhase::Measuring => {
                let go_at = self.go_at?;
                let elapsed_ms = now.saturating_duration_since(go_at).as_secs_f64() * 1000.0;
                self.phase = TreePhase::Scored;
                (elapsed_ms / 1000.0, classify(elapsed_ms))
            }
            _ => return None,
        };

        self.next_id += 1;
        let entry = ReactionLogEntry {
            id: self.next_id,
            timestamp: Utc::now(),
            measured_value_seconds: value,
            classification,
        };
        tracing::info!(
            "Reaction {}: {} ({:.3}s)",
            entry.id,
            entry.classification,
            entry.measured_value_seconds
        );
        self.log.insert(0, entry.clone());
        self.last_result = Some(entry.clone());
        Some(entry)
    }

    /// Current phase
    pub fn phase(&self) -> TreePhase {
        self.phase
    }

    /// Generation counter; scheduled steps from an older generation are ignored
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Copy of the observable state
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            generation: self.generation,
            phase: self.phase,
            lamps: self.lamps,
            go_at: self.go_at,
            last_result: self.last_result.clone(),
        }
    }

    /// Reaction log, most recent first
    pub fn log(&self) -> &[ReactionLogEntry] {
        &self.log
    }

    /// Empty the reaction log and restart numbering
    pub fn clear_log(&mut self) {
        self.log.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_step_from_old_generation_is_discarded() {
        let now = Instant::now();
        let mut tree = ChristmasTree::new();
        let old = tree.start();
        let current = tree.start();

        assert!(!tree.apply(old, TreeStep::Green, now));
        assert_eq!(tree.phase(), TreePhase::Armed);
        assert!(tree.apply(current, TreeStep::Light(Lamp::Amber1), now));
        assert_eq!(tree.snapshot().lamp(Lamp::Amber1), LampState::Amber);
    }

    #[test]
    fn test_green_after_foul_is_discarded() {
        let now = Instant::now();
        let mut tree = ChristmasTree::new();
        let generation = tree.start();
        let foul = tree.react(now).unwrap();
        assert_eq!(foul.classification, Classification::Early);
        assert_eq!(foul.measured_value_seconds, 0.0);

        assert!(!tree.apply(generation, TreeStep::Green, now));
        let snapshot = tree.snapshot();
        assert_eq!(snapshot.phase, TreePhase::Fouled);
        assert_eq!(snapshot.lamp(Lamp::Go), LampState::Red);
        assert!(snapshot.go_at.is_none());
    }

    #[test]
    fn test_react_scores_elapsed_time() {
        let go = Instant::now();
        let mut tree = ChristmasTree::new();
        let generation = tree.start();
        tree.apply(generation, TreeStep::Light(Lamp::Amber3), go);
        tree.apply(generation, TreeStep::Green, go);
        assert_eq!(tree.snapshot().lamp(Lamp::Amber3), LampState::Off);

        let entry = tree.react(go + Duration::from_millis(120)).unwrap();
        assert_eq!(entry.classification, Classification::Late);
        assert!((entry.measured_value_seconds - 0.120).abs() < 1e-6);
        assert_eq!(tree.phase(), TreePhase::Scored);

        // A second press does nothing
        assert!(tree.react(go + Duration::from_millis(200)).is_none());
    }

    #[test]
    fn test_react_when_idle_is_ignored() {
        let mut tree = ChristmasTree::new();
        assert!(tree.react(Instant::now()).is_none());
        assert!(tree.log().is_empty());
    }

    #[test]
    fn test_log_is_most_recent_first_and_survives_reset() {
        let now = Instant::now();
        let mut tree = ChristmasTree::new();
        tree.start();
        tree.react(now);
        tree.start();
        tree.react(now);
        tree.reset();

        let ids: Vec<u32> = tree.log().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(tree.phase(), TreePhase::Idle);
        assert!(tree.snapshot().last_result.is_none());
    }
}
