//! Bracket Racing
//!
//! Dial-in judging for logged passes and single-elimination bracket layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds above the dial-in that still count as on dial
pub const DIAL_IN_TOLERANCE_SEC: f64 = 0.05;

/// Name used for an empty first-round slot
pub const BYE: &str = "BYE";

/// Name used for slots decided by earlier rounds
pub const TO_BE_DECIDED: &str = "TBD";

/// Outcome of a pass against the dial-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DialInVerdict {
    /// Ran quicker than the dial-in
    BrokeOut,
    /// Within the tolerance above the dial-in
    OnDial,
    /// Slower than the dial-in plus tolerance
    TooSlow,
}

impl DialInVerdict {
    /// Display text for the verdict
    pub fn label(&self) -> &'static str {
        match self {
            DialInVerdict::BrokeOut => "BROKE OUT!",
            DialInVerdict::OnDial => "ON DIAL!",
            DialInVerdict::TooSlow => "TOO SLOW!",
        }
    }
}

impl std::fmt::Display for DialInVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Judge an elapsed time against a dial-in (both in seconds)
pub fn judge_run(elapsed_time: f64, dial_in: f64) -> DialInVerdict {
    if elapsed_time < dial_in {
        DialInVerdict::BrokeOut
    } else if elapsed_time > dial_in + DIAL_IN_TOLERANCE_SEC {
        DialInVerdict::TooSlow
    } else {
        DialInVerdict::OnDial
    }
}

/// One logged pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunLogEntry {
    /// Sequence number, starting at 1
    pub id: u32,
    /// When the pass was logged
    pub date: DateTime<Utc>,
    /// Declared dial-in (seconds)
    pub dial_in: f64,
    /// Elapsed time (seconds)
    pub et: f64,
    /// Trap speed (mph)
    pub mph: f64,
    /// Reaction time (seconds)
    pub rt: f64,
}

impl RunLogEntry {
    /// Judge this pass against its dial-in
    pub fn verdict(&self) -> DialInVerdict {
        judge_run(self.et, self.dial_in)
    }
}

/// Pass log, most recent first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    entries: Vec<RunLogEntry>,
}

impl RunLog {
    /// Empty run log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pass and return it
    pub fn record(&mut self, dial_in: f64, et: f64, mph: f64, rt: f64) -> &RunLogEntry {
        let entry = RunLogEntry {
            id: self.entries.len() as u32 + 1,
            date: Utc::now(),
            dial_in,
            et,
            mph,
            rt,
        };
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    /// Passes, most recent first
    pub fn entries(&self) -> &[RunLogEntry] {
        &self.entries
    }

    /// Most recent pass
    pub fn latest(&self) -> Option<&RunLogEntry> {
        self.entries.first()
    }
}

/// A pairing in a bracket round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Left lane racer
    pub left: String,
    /// Right lane racer, `BYE` when unpaired
    pub right: String,
}

/// Lay out a single-elimination bracket.
///
/// The first round pairs participants in order, padding with byes up to the
/// next power of two. Later rounds are placeholders.
pub fn single_elimination_rounds(participants: &[String]) -> Vec<Vec<Match>> {
    if participants.len() < 2 {
        return Vec::new();
    }
    let slots = participants.len().next_power_of_two();
    let rounds = slots.trailing_zeros() as usize;

    let slot = |i: usize| participants.get(i).map(String::as_str).unwrap_or(BYE).to_string();

    (0..rounds)
        .map(|round| {
            let match_count = slots >> (round + 1);
            (0..match_count)
                .map(|m| {
                    if round == 0 {
                        Match {
                            left: slot(m * 2),
                            right: slot(m * 2 + 1),
                        }
                    } else {
                        Match {
                            left: TO_BE_DECIDED.to_string(),
                            right: TO_BE_DECIDED.to_string(),
                        }
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_run() {
        assert_eq!(judge_run(10.49, 10.50), DialInVerdict::BrokeOut);
        assert_eq!(judge_run(10.50, 10.50), DialInVerdict::OnDial);
        assert_eq!(judge_run(10.54, 10.50), DialInVerdict::OnDial);
        assert_eq!(judge_run(10.60, 10.50), DialInVerdict::TooSlow);
    }

    #[test]
    fn test_run_log_most_recent_first() {
        let mut log = RunLog::new();
        log.record(10.5, 10.52, 128.0, 0.04);
        log.record(10.5, 10.40, 130.0, 0.05);

        assert_eq!(log.entries().len(), 2);
        let latest = log.latest().unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(latest.verdict(), DialInVerdict::BrokeOut);
    }
}
