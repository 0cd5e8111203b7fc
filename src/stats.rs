//! Session statistics
//!
//! In-memory record of finished rounds for the HUD. Not persisted.

use serde::{Deserialize, Serialize};

use crate::sim::Outcome;

/// Maximum number of recent results to keep
pub const MAX_RECENT: usize = 10;

/// A single finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub outcome: Outcome,
    /// Pipes cleared by the player
    pub score: u64,
    /// Ticks the round lasted
    pub ticks: u64,
}

/// Results since the program started
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub best_score: u64,
    /// Newest first
    pub recent: Vec<RoundRecord>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished round. Returns true if it set a new best score.
    pub fn record(&mut self, outcome: Outcome, score: u64, ticks: u64) -> bool {
        self.rounds += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Lose => self.losses += 1,
        }

        let new_best = score > self.best_score;
        if new_best {
            self.best_score = score;
            log::info!("New best score: {}", score);
        }

        self.recent.insert(
            0,
            RoundRecord {
                outcome,
                score,
                ticks,
            },
        );
        self.recent.truncate(MAX_RECENT);

        new_best
    }

    /// Fraction of rounds won (0 when nothing has been played)
    pub fn win_rate(&self) -> f32 {
        if self.rounds == 0 {
            0.0
        } else {
            self.wins as f32 / self.rounds as f32
        }
    }

    /// Most recent result (if any)
    pub fn last(&self) -> Option<&RoundRecord> {
        self.recent.first()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds == 0
    }
}
