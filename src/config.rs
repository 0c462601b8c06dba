use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::deck::record::IdRange;
use crate::engine::answer::AnswerMatch;
use crate::engine::distractor::DEFAULT_DISTRACTOR_COUNT;
use crate::engine::sampler::{QuizMode, SampleRequest};
use crate::session::question::QuizDirection;
use crate::session::quiz::EngineOptions;

pub const MAX_DISTRACTORS: usize = 8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Deck file; the bundled sample deck when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub direction: QuizDirection,
    /// Unset bounds follow the loaded deck's smallest and largest id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_end: Option<u32>,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_distractor_count")]
    pub distractor_count: usize,
    #[serde(default)]
    pub mode: QuizMode,
    #[serde(default)]
    pub answer_match: AnswerMatch,
    #[serde(default)]
    pub typed_answers: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_question_count() -> usize {
    5
}
fn default_distractor_count() -> usize {
    DEFAULT_DISTRACTOR_COUNT
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deck: None,
            group: None,
            direction: QuizDirection::default(),
            range_start: None,
            range_end: None,
            question_count: default_question_count(),
            distractor_count: default_distractor_count(),
            mode: QuizMode::default(),
            answer_match: AnswerMatch::default(),
            typed_answers: false,
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordquiz")
            .join("config.toml")
    }

    /// Clamp counts into their valid ranges. Call after deserializing or
    /// applying command line overrides.
    pub fn normalize(&mut self) {
        self.question_count = self.question_count.max(1);
        self.distractor_count = self.distractor_count.min(MAX_DISTRACTORS);
    }

    /// The configured range, with unset bounds taken from `bounds`.
    pub fn range(&self, bounds: IdRange) -> IdRange {
        IdRange::new(
            self.range_start.unwrap_or(bounds.start),
            self.range_end.unwrap_or(bounds.end),
        )
    }

    pub fn sample_request(&self, bounds: IdRange) -> SampleRequest {
        SampleRequest {
            range: self.range(bounds),
            count: self.question_count.max(1),
            mode: self.mode,
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            distractor_count: self.distractor_count,
            answer_match: self.answer_match,
        }
    }
}
