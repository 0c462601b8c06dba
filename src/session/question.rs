use serde::{Deserialize, Serialize};

use crate::deck::record::WordRecord;

/// Which side of a record is shown and which side is the answer key. Fixed
/// for a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizDirection {
    #[default]
    TermToMeaning,
    MeaningToTerm,
}

impl QuizDirection {
    pub fn label(self) -> &'static str {
        match self {
            QuizDirection::TermToMeaning => "term → meaning",
            QuizDirection::MeaningToTerm => "meaning → term",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            QuizDirection::TermToMeaning => QuizDirection::MeaningToTerm,
            QuizDirection::MeaningToTerm => QuizDirection::TermToMeaning,
        }
    }

    pub fn prompt(self, record: &WordRecord) -> &str {
        match self {
            QuizDirection::TermToMeaning => &record.term,
            QuizDirection::MeaningToTerm => &record.meaning,
        }
    }

    pub fn answer(self, record: &WordRecord) -> &str {
        match self {
            QuizDirection::TermToMeaning => &record.meaning,
            QuizDirection::MeaningToTerm => &record.term,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub record: WordRecord,
    pub prompt: String,
    pub correct_answer: String,
    /// Shuffled; holds `correct_answer` exactly once.
    pub choices: Vec<String>,
    /// Fewer distractors than requested were available.
    pub short_of_choices: bool,
}

/// What the presentation surface needs to render one question.
#[derive(Clone, Copy, Debug)]
pub struct QuestionView<'a> {
    /// Zero-based.
    pub position: usize,
    pub total: usize,
    pub prompt: &'a str,
    pub choices: &'a [String],
    pub short_of_choices: bool,
    pub record: &'a WordRecord,
}
