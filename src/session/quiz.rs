use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::deck::record::WordRecord;
use crate::engine::answer::AnswerMatch;
use crate::engine::distractor::{self, DEFAULT_DISTRACTOR_COUNT};
use crate::engine::history::{AskedHistory, MissedLedger};
use crate::engine::sampler::{self, QuizMode, SampleRequest};
use crate::error::QuizError;
use crate::session::question::{Question, QuestionView, QuizDirection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    NotStarted,
    InProgress,
    Finished,
}

impl QuizPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizPhase::NotStarted => "not started",
            QuizPhase::InProgress => "in progress",
            QuizPhase::Finished => "finished",
        }
    }
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wrong answer as it appeared in the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedItem {
    pub id: u32,
    pub prompt: String,
    pub correct_answer: String,
}

/// Result of one submission, for immediate feedback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub prompt: String,
    pub given: String,
    pub correct_answer: String,
    /// The submission answered the last question.
    pub finished: bool,
}

/// One quiz attempt.
///
/// Invariants: `current_index <= records.len()`, finished exactly when
/// `current_index == records.len()`, and
/// `correct_count + missed.len() == current_index`.
#[derive(Clone, Debug)]
pub struct SessionState {
    direction: QuizDirection,
    mode: QuizMode,
    records: Vec<WordRecord>,
    fallback_answers: Vec<String>,
    current: Option<Question>,
    current_index: usize,
    correct_count: usize,
    missed: Vec<MissedItem>,
}

impl SessionState {
    pub fn direction(&self) -> QuizDirection {
        self.direction
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn records(&self) -> &[WordRecord] {
        &self.records
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn missed(&self) -> &[MissedItem] {
        &self.missed
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.records.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn progress(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.current_index as f64 / self.records.len() as f64
    }

    /// Choices for question `index` come from the other words of this
    /// session, topped up from the fallback pool when those are too few.
    fn build_question<R: Rng + ?Sized>(
        &self,
        index: usize,
        k: usize,
        rng: &mut R,
    ) -> Option<Question> {
        let record = self.records.get(index)?;
        let correct = self.direction.answer(record);
        let pool: Vec<&str> = self
            .records
            .iter()
            .filter(|r| r.id != record.id)
            .map(|r| self.direction.answer(r))
            .collect();
        let fallback: Vec<&str> = self.fallback_answers.iter().map(String::as_str).collect();

        let set = distractor::generate(correct, &pool, &fallback, k, rng);
        if set.is_short() {
            tracing::warn!(
                "question {} ('{}') has {} choices, wanted {}",
                index + 1,
                self.direction.prompt(record),
                set.choices.len(),
                k + 1
            );
        }

        Some(Question {
            record: record.clone(),
            prompt: self.direction.prompt(record).to_string(),
            correct_answer: correct.to_string(),
            short_of_choices: set.is_short(),
            choices: set.choices,
        })
    }
}

/// Quiz lifecycle owned by the host, one per learner.
#[derive(Clone, Debug, Default)]
pub enum QuizState {
    #[default]
    NotStarted,
    Active(SessionState),
}

impl QuizState {
    pub fn phase(&self) -> QuizPhase {
        match self {
            QuizState::NotStarted => QuizPhase::NotStarted,
            QuizState::Active(s) if s.is_finished() => QuizPhase::Finished,
            QuizState::Active(_) => QuizPhase::InProgress,
        }
    }

    pub fn session(&self) -> Option<&SessionState> {
        match self {
            QuizState::NotStarted => None,
            QuizState::Active(s) => Some(s),
        }
    }

    /// The question awaiting an answer, if any.
    pub fn current_view(&self) -> Option<QuestionView<'_>> {
        let session = self.session()?;
        let question = session.current.as_ref()?;
        Some(QuestionView {
            position: session.current_index,
            total: session.records.len(),
            prompt: &question.prompt,
            choices: &question.choices,
            short_of_choices: question.short_of_choices,
            record: &question.record,
        })
    }

    /// Discards the session. Asked history and missed ledger are untouched.
    pub fn reset(&mut self) {
        *self = QuizState::NotStarted;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    pub distractor_count: usize,
    pub answer_match: AnswerMatch,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            distractor_count: DEFAULT_DISTRACTOR_COUNT,
            answer_match: AnswerMatch::default(),
        }
    }
}

/// Drives `QuizState` transitions. Holds the random source and handles to
/// the shared asked history and missed ledger; the per-learner state is
/// passed in by the host on every call.
pub struct QuizEngine<R: Rng = SmallRng> {
    rng: R,
    pub options: EngineOptions,
    history: AskedHistory,
    ledger: MissedLedger,
}

impl QuizEngine<SmallRng> {
    pub fn from_entropy(options: EngineOptions) -> Self {
        Self::new(SmallRng::from_entropy(), options)
    }

    pub fn seeded(seed: u64, options: EngineOptions) -> Self {
        Self::new(SmallRng::seed_from_u64(seed), options)
    }
}

impl<R: Rng> QuizEngine<R> {
    pub fn new(rng: R, options: EngineOptions) -> Self {
        Self::with_progress(rng, options, AskedHistory::default(), MissedLedger::default())
    }

    pub fn with_progress(
        rng: R,
        options: EngineOptions,
        history: AskedHistory,
        ledger: MissedLedger,
    ) -> Self {
        Self {
            rng,
            options,
            history,
            ledger,
        }
    }

    pub fn history(&self) -> &AskedHistory {
        &self.history
    }

    pub fn ledger(&self) -> &MissedLedger {
        &self.ledger
    }

    /// Samples words per `request` and starts a session with them. `corpus`
    /// also serves as the fallback distractor pool. On error `state` is left
    /// as it was.
    pub fn launch(
        &mut self,
        state: &mut QuizState,
        corpus: &[WordRecord],
        request: &SampleRequest,
        direction: QuizDirection,
    ) -> Result<(), QuizError> {
        ensure_not_started(state, "start")?;
        let records = sampler::select(corpus, request, &self.history, &self.ledger, &mut self.rng)?;
        self.start(state, records, direction, request.mode, corpus)
    }

    /// Starts a session over exactly `records`, in the given order.
    pub fn start(
        &mut self,
        state: &mut QuizState,
        records: Vec<WordRecord>,
        direction: QuizDirection,
        mode: QuizMode,
        fallback: &[WordRecord],
    ) -> Result<(), QuizError> {
        ensure_not_started(state, "start")?;
        if records.is_empty() {
            return Err(QuizError::EmptyCorpus {
                origin: "the selected words".to_string(),
            });
        }

        let mut session = SessionState {
            direction,
            mode,
            records,
            fallback_answers: fallback
                .iter()
                .map(|r| direction.answer(r).to_string())
                .collect(),
            current: None,
            current_index: 0,
            correct_count: 0,
            missed: Vec::new(),
        };
        session.current =
            session.build_question(0, self.options.distractor_count, &mut self.rng);

        tracing::info!(
            "started {mode} quiz: {} questions, {}",
            session.total(),
            direction.label()
        );
        *state = QuizState::Active(session);
        Ok(())
    }

    /// Scores `choice` against the current question and advances. The next
    /// question's choices are built here, not at session start.
    pub fn submit_answer(
        &mut self,
        state: &mut QuizState,
        choice: &str,
    ) -> Result<AnswerOutcome, QuizError> {
        let phase = state.phase();
        let session = match state {
            QuizState::Active(s) if phase == QuizPhase::InProgress => s,
            _ => {
                return Err(QuizError::InvalidState {
                    action: "submit_answer",
                    phase: phase.as_str(),
                });
            }
        };
        let question = session.current.take().ok_or(QuizError::InvalidState {
            action: "submit_answer",
            phase: phase.as_str(),
        })?;

        let correct = self
            .options
            .answer_match
            .matches(choice, &question.correct_answer);
        if correct {
            session.correct_count += 1;
            if session.mode == QuizMode::RetestMissed && self.ledger.remove(question.record.id) {
                tracing::debug!("word {} cleared from missed ledger", question.record.id);
            }
        } else {
            session.missed.push(MissedItem {
                id: question.record.id,
                prompt: question.prompt.clone(),
                correct_answer: question.correct_answer.clone(),
            });
            self.ledger.record(&question.record);
        }

        session.current_index += 1;
        let finished = session.is_finished();
        if finished {
            tracing::info!(
                "quiz finished: {}/{} correct",
                session.correct_count,
                session.total()
            );
        } else {
            session.current = session.build_question(
                session.current_index,
                self.options.distractor_count,
                &mut self.rng,
            );
        }

        Ok(AnswerOutcome {
            correct,
            prompt: question.prompt,
            given: choice.to_string(),
            correct_answer: question.correct_answer,
            finished,
        })
    }
}

fn ensure_not_started(state: &QuizState, action: &'static str) -> Result<(), QuizError> {
    match state.phase() {
        QuizPhase::NotStarted => Ok(()),
        phase => Err(QuizError::InvalidState {
            action,
            phase: phase.as_str(),
        }),
    }
}
