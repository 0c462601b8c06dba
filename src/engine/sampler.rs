use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::deck::record::{IdRange, WordRecord};
use crate::engine::history::{AskedHistory, MissedLedger};
use crate::error::QuizError;
use crate::session::result::to_retest_corpus;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizMode {
    #[default]
    Normal,
    /// Skip words already presented in earlier sessions.
    AvoidAsked,
    /// Quiz only words currently in the missed ledger.
    RetestMissed,
}

impl QuizMode {
    pub const ALL: [QuizMode; 3] = [QuizMode::Normal, QuizMode::AvoidAsked, QuizMode::RetestMissed];

    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Normal => "normal",
            QuizMode::AvoidAsked => "avoid-asked",
            QuizMode::RetestMissed => "retest-missed",
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draws up to `count` distinct records with ids in `range`, minus
/// `exclude`, in random order.
///
/// Duplicate ids in `corpus` collapse to their first row. An empty eligible
/// set is `EmptyRange`, never an empty list.
pub fn sample<R: Rng + ?Sized>(
    corpus: &[WordRecord],
    range: IdRange,
    count: usize,
    exclude: Option<&HashSet<u32>>,
    rng: &mut R,
) -> Result<Vec<WordRecord>, QuizError> {
    let mode = if exclude.is_some() {
        QuizMode::AvoidAsked
    } else {
        QuizMode::Normal
    };
    let eligible = eligible(corpus, range, exclude);
    draw(eligible, count, rng).ok_or(QuizError::EmptyRange { range, mode })
}

fn eligible<'a>(
    corpus: &'a [WordRecord],
    range: IdRange,
    exclude: Option<&HashSet<u32>>,
) -> Vec<&'a WordRecord> {
    let mut seen = HashSet::new();
    corpus
        .iter()
        .filter(|r| range.contains(r.id))
        .filter(|r| exclude.is_none_or(|ids| !ids.contains(&r.id)))
        .filter(|r| seen.insert(r.id))
        .collect()
}

fn draw<R: Rng + ?Sized>(
    eligible: Vec<&WordRecord>,
    count: usize,
    rng: &mut R,
) -> Option<Vec<WordRecord>> {
    if eligible.is_empty() {
        return None;
    }
    let take = count.min(eligible.len());
    Some(
        eligible
            .choose_multiple(rng, take)
            .map(|r| (*r).clone())
            .collect(),
    )
}

/// What to quiz and how many.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleRequest {
    pub range: IdRange,
    pub count: usize,
    pub mode: QuizMode,
}

/// Picks the records for a new session according to `request.mode`.
///
/// In `AvoidAsked` mode the drawn ids are registered into `history` right
/// away, so a session abandoned midway still spends them. `RetestMissed`
/// draws from the ledger alone and ignores both the range and the history.
pub fn select<R: Rng + ?Sized>(
    corpus: &[WordRecord],
    request: &SampleRequest,
    history: &AskedHistory,
    ledger: &MissedLedger,
    rng: &mut R,
) -> Result<Vec<WordRecord>, QuizError> {
    let drawn = match request.mode {
        QuizMode::Normal => sample(corpus, request.range, request.count, None, rng)?,
        QuizMode::AvoidAsked => {
            let asked = history.snapshot();
            let drawn = sample(corpus, request.range, request.count, Some(&asked), rng)?;
            history.register(drawn.iter().map(|r| r.id));
            drawn
        }
        QuizMode::RetestMissed => {
            let missed = to_retest_corpus(ledger);
            let eligible = eligible(&missed, IdRange::ALL, None);
            draw(eligible, request.count, rng).ok_or(QuizError::EmptyRange {
                range: IdRange::ALL,
                mode: QuizMode::RetestMissed,
            })?
        }
    };
    tracing::debug!(
        "sampled {} of {} requested words ({} mode, {})",
        drawn.len(),
        request.count,
        request.mode,
        request.range
    );
    Ok(drawn)
}
