use std::fmt;

use serde::{Deserialize, Serialize};

/// One vocabulary entry. Identity is `id`: two records with the same id are
/// the same word across sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: u32,
    pub term: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_target: Option<String>,
}

impl WordRecord {
    pub fn new(id: u32, term: &str, meaning: &str) -> Self {
        Self {
            id,
            term: term.to_string(),
            meaning: meaning.to_string(),
            group: None,
            part_of_speech: None,
            example_source: None,
            example_target: None,
        }
    }
}

/// Inclusive interval of record ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub start: u32,
    pub end: u32,
}

impl IdRange {
    /// Every id. Used by retest sessions, which ignore the configured range.
    pub const ALL: IdRange = IdRange {
        start: 0,
        end: u32::MAX,
    };

    /// Builds a range, swapping the bounds if they arrive reversed.
    pub fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.start <= id && id <= self.end
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == IdRange::ALL {
            write!(f, "any id")
        } else {
            write!(f, "{}..={}", self.start, self.end)
        }
    }
}
