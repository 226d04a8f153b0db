//! Timed driver for the Christmas tree
//!
//! Each lamp transition is a tokio task sleeping until its scheduled instant.
//! The tasks are tracked so a reaction, reset or restart cancels every
//! pending transition before touching the tree. A transition that loses the
//! race with a cancel is still rejected by the tree's generation check.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use super::{ChristmasTree, ReactionLogEntry, TreeSnapshot, TreeTiming};

/// Notifications published by the sequencer
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    /// A scheduled step changed the lamps
    LampsChanged(TreeSnapshot),
    /// The sequence ended with a reaction
    Finished(ReactionLogEntry),
    /// A perfect reaction that may go to the leaderboard
    LeaderboardEligible(ReactionLogEntry),
}

/// Runs start sequences on the tokio runtime
///
/// Must be used from within a tokio runtime.
pub struct ReactionSequencer {
    tree: Arc<Mutex<ChristmasTree>>,
    timing: TreeTiming,
    pending: Vec<JoinHandle<()>>,
    events: mpsc::UnboundedSender<SequencerEvent>,
}

impl ReactionSequencer {
    /// Create a sequencer and the receiver for its events
    pub fn new(timing: TreeTiming) -> (Self, mpsc::UnboundedReceiver<SequencerEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                tree: Arc::new(Mutex::new(ChristmasTree::new())),
                timing,
                pending: Vec::new(),
                events,
            },
            rx,
        )
    }

    /// Lamp schedule in use
    pub fn timing(&self) -> TreeTiming {
        self.timing
    }

    /// Start a new sequence, abandoning any running one
    pub fn start(&mut self) {
        self.cancel_pending();

        let generation = lock(&self.tree).start();
        let started = Instant::now();

        for (offset, step) in self.timing.schedule() {
            let tree = Arc::clone(&self.tree);
            let events = self.events.clone();
            let deadline = started + offset;

            self.pending.push(tokio::spawn(async move {
                sleep_until(deadline).await;
                let snapshot = {
                    let mut tree = lock(&tree);
                    if !tree.apply(generation, step, Instant::now()) {
                        return;
                    }
                    tree.snapshot()
                };
                // Receiver may be gone; the tree state is still authoritative.
                let _ = events.send(SequencerEvent::LampsChanged(snapshot));
            }));
        }
    }

    /// Register the user's reaction. Returns the recorded entry, if any.
    pub fn react(&mut self) -> Option<ReactionLogEntry> {
        let now = Instant::now();
        self.cancel_pending();

        let (entry, snapshot) = {
            let mut tree = lock(&self.tree);
            let entry = tree.react(now)?;
            (entry, tree.snapshot())
        };

        let _ = self.events.send(SequencerEvent::LampsChanged(snapshot));
        let _ = self.events.send(SequencerEvent::Finished(entry.clone()));
        if entry.is_leaderboard_eligible() {
            let _ = self
                .events
                .send(SequencerEvent::LeaderboardEligible(entry.clone()));
        }
        Some(entry)
    }

    /// Cancel everything and return to idle. The log is kept.
    pub fn reset(&mut self) {
        self.cancel_pending();
        lock(&self.tree).reset();
    }

    /// Current tree state
    pub fn snapshot(&self) -> TreeSnapshot {
        lock(&self.tree).snapshot()
    }

    /// Reaction log, most recent first
    pub fn log(&self) -> Vec<ReactionLogEntry> {
        lock(&self.tree).log().to_vec()
    }

    /// Empty the reaction log and restart numbering
    pub fn clear_log(&mut self) {
        lock(&self.tree).clear_log();
    }

    /// Number of scheduled transitions that have not fired yet
    pub fn pending_transitions(&self) -> usize {
        self.pending.iter().filter(|h| !h.is_finished()).count()
    }

    fn cancel_pending(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for ReactionSequencer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

fn lock(tree: &Mutex<ChristmasTree>) -> MutexGuard<'_, ChristmasTree> {
    tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
