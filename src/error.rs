//! Error taxonomy for the quiz engine.
//!
//! Everything except `InvalidState` is recoverable: the host reports it and
//! lets the learner pick another range, mode or deck.

use thiserror::Error;

use crate::deck::record::IdRange;
use crate::engine::sampler::QuizMode;

#[derive(Debug, Error)]
pub enum QuizError {
    /// No record survived the range, history or ledger filters.
    #[error("no eligible words in {range} for {mode} mode; choose a different range or mode")]
    EmptyRange { range: IdRange, mode: QuizMode },

    /// The data source produced zero usable rows.
    #[error("{origin} contains no usable words")]
    EmptyCorpus { origin: String },

    /// The backing storage is missing or unreadable.
    #[error("cannot load {origin}: {reason}")]
    SourceUnavailable { origin: String, reason: String },

    /// The host called an action the current phase does not allow.
    #[error("{action} is not allowed while the quiz is {phase}")]
    InvalidState {
        action: &'static str,
        phase: &'static str,
    },
}

impl QuizError {
    /// True for errors the learner can fix by changing input, as opposed to
    /// host bugs.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, QuizError::InvalidState { .. })
    }
}
