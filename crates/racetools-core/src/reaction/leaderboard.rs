//! Reaction-time leaderboard
//!
//! Only perfect reactions are accepted. Entries rank fastest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{Classification, ReactionLogEntry};

/// Default number of entries returned by [`Leaderboard::top`]
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Errors from leaderboard submissions
#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// Blank username
    #[error("Username must not be empty")]
    EmptyUsername,

    /// Only perfect reactions are ranked
    #[error("Only perfect reactions can be submitted (got {0})")]
    NotEligible(Classification),

    /// Negative or non-finite reaction time
    #[error("Invalid reaction time: {0}")]
    InvalidTime(f64),
}

/// A ranked reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Entry id (UUID v4)
    pub id: String,
    /// Submitting user
    pub username: String,
    /// Reaction time in milliseconds
    pub reaction_time_ms: f64,
    /// Always [`Classification::Perfect`] for accepted entries
    pub result: Classification,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

/// Collaborator that ranks submitted reactions
pub trait Leaderboard {
    /// Submit a reaction under `username`
    fn submit(
        &mut self,
        username: &str,
        reaction: &ReactionLogEntry,
    ) -> Result<LeaderboardEntry, LeaderboardError>;

    /// Fastest `limit` entries, fastest first
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}

/// Leaderboard kept in memory
#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    /// Sorted fastest first
    entries: Vec<LeaderboardEntry>,
}

impl MemoryLeaderboard {
    /// Empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ranked entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn submit(
        &mut self,
        username: &str,
        reaction: &ReactionLogEntry,
    ) -> Result<LeaderboardEntry, LeaderboardError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LeaderboardError::EmptyUsername);
        }
        if !reaction.is_leaderboard_eligible() {
            return Err(LeaderboardError::NotEligible(reaction.classification));
        }
        let reaction_time_ms = reaction.measured_ms();
        if !reaction_time_ms.is_finite() || reaction_time_ms < 0.0 {
            return Err(LeaderboardError::InvalidTime(reaction_time_ms));
        }

        let entry = LeaderboardEntry {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            reaction_time_ms,
            result: reaction.classification,
            created_at: Utc::now(),
        };

        // Insert after equal times so earlier submissions keep their rank
        let at = self
            .entries
            .partition_point(|e| e.reaction_time_ms <= reaction_time_ms);
        self.entries.insert(at, entry.clone());
        tracing::info!("{} posted {:.1} ms", entry.username, reaction_time_ms);
        Ok(entry)
    }

    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.entries.iter().take(limit).cloned().collect())
    }
}
