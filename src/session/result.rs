use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deck::record::WordRecord;
use crate::engine::history::MissedLedger;
use crate::engine::sampler::QuizMode;
use crate::session::question::QuizDirection;
use crate::session::quiz::{MissedItem, SessionState};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizSummary {
    pub correct_count: usize,
    pub total: usize,
    /// Less than `total` when the session was abandoned.
    pub answered: usize,
    /// `correct_count / total`, 0.0 for an empty session.
    pub accuracy: f64,
    pub missed: Vec<MissedItem>,
    pub mode: QuizMode,
    pub direction: QuizDirection,
    pub finished_at: DateTime<Utc>,
}

impl QuizSummary {
    pub fn from_session(session: &SessionState) -> Self {
        let total = session.total();
        let correct_count = session.correct_count();
        let accuracy = if total > 0 {
            correct_count as f64 / total as f64
        } else {
            0.0
        };

        Self {
            correct_count,
            total,
            answered: session.current_index(),
            accuracy,
            missed: session.missed().to_vec(),
            mode: session.mode(),
            direction: session.direction(),
            finished_at: Utc::now(),
        }
    }

    pub fn accuracy_percent(&self) -> f64 {
        (self.accuracy * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct_count == self.total
    }

    /// One line per miss, or a congratulation when nothing was missed.
    pub fn report(&self) -> String {
        if self.missed.is_empty() {
            return if self.is_perfect() {
                "All correct!".to_string()
            } else {
                "No misses recorded.".to_string()
            };
        }
        self.missed
            .iter()
            .map(|m| format!("- {} → {}", m.prompt, m.correct_answer))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Records for a "missed only" session: the ledger's current contents.
pub fn to_retest_corpus(ledger: &MissedLedger) -> Vec<WordRecord> {
    ledger.records()
}
