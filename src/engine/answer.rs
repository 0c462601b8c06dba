use std::fmt;

use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};

/// How a submitted answer is compared with the answer key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerMatch {
    /// Byte-for-byte equality. Right for multiple choice, where the
    /// submitted string is one of the offered choices.
    #[default]
    Exact,
    /// Trimmed, NFC-normalized, lowercased comparison for typed answers.
    CaseInsensitive,
}

impl AnswerMatch {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerMatch::Exact => "exact",
            AnswerMatch::CaseInsensitive => "case-insensitive",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AnswerMatch::Exact => AnswerMatch::CaseInsensitive,
            AnswerMatch::CaseInsensitive => AnswerMatch::Exact,
        }
    }

    pub fn matches(self, given: &str, expected: &str) -> bool {
        match self {
            AnswerMatch::Exact => given == expected,
            AnswerMatch::CaseInsensitive => fold(given) == fold(expected),
        }
    }
}

impl fmt::Display for AnswerMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn fold(text: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(text.trim()).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_is_case_sensitive() {
        assert!(AnswerMatch::Exact.matches("Cat", "Cat"));
        assert!(!AnswerMatch::Exact.matches("cat", "Cat"));
        assert!(!AnswerMatch::Exact.matches(" Cat", "Cat"));
    }

    #[test]
    fn case_insensitive_ignores_case_and_padding() {
        assert!(AnswerMatch::CaseInsensitive.matches("  CAT ", "cat"));
        assert!(!AnswerMatch::CaseInsensitive.matches("cats", "cat"));
    }

    #[test]
    fn case_insensitive_normalizes_composed_forms() {
        // "é" precomposed vs. "e" + combining acute
        assert!(AnswerMatch::CaseInsensitive.matches("caf\u{e9}", "CAFE\u{301}"));
        assert!(!AnswerMatch::Exact.matches("caf\u{e9}", "cafe\u{301}"));
    }
}
