use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::Deserialize;

use crate::deck::record::{IdRange, WordRecord};
use crate::error::QuizError;

#[derive(Embed)]
#[folder = "assets/decks/"]
struct DeckAssets;

/// Supplies normalized word records. Loading happens once, before any quiz
/// starts; the returned corpus is an immutable snapshot.
pub trait DataSource {
    fn origin(&self) -> String;
    fn load_corpus(&self) -> Result<Corpus, QuizError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeckFormat {
    Json,
    Toml,
}

impl DeckFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(DeckFormat::Json),
            "toml" => Some(DeckFormat::Toml),
            _ => None,
        }
    }
}

/// A deck file on disk.
pub struct DeckFile {
    path: PathBuf,
}

impl DeckFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for DeckFile {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn load_corpus(&self) -> Result<Corpus, QuizError> {
        let origin = self.origin();
        let format =
            DeckFormat::from_path(&self.path).ok_or_else(|| QuizError::SourceUnavailable {
                origin: origin.clone(),
                reason: "unsupported deck format (expected .json or .toml)".to_string(),
            })?;
        let content = fs::read_to_string(&self.path).map_err(|e| QuizError::SourceUnavailable {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;
        parse_deck(&content, format, &origin)
    }
}

/// A deck compiled into the binary.
pub struct BundledDeck {
    name: String,
}

impl BundledDeck {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn available() -> Vec<String> {
        DeckAssets::iter()
            .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for BundledDeck {
    fn default() -> Self {
        Self::new("sample")
    }
}

impl DataSource for BundledDeck {
    fn origin(&self) -> String {
        format!("bundled deck '{}'", self.name)
    }

    fn load_corpus(&self) -> Result<Corpus, QuizError> {
        let origin = self.origin();
        let file = DeckAssets::get(&format!("{}.json", self.name)).ok_or_else(|| {
            QuizError::SourceUnavailable {
                origin: origin.clone(),
                reason: "no such bundled deck".to_string(),
            }
        })?;
        let content =
            std::str::from_utf8(file.data.as_ref()).map_err(|e| QuizError::SourceUnavailable {
                origin: origin.clone(),
                reason: e.to_string(),
            })?;
        parse_deck(content, DeckFormat::Json, &origin)
    }
}

/// Validated snapshot of a deck. Rows are kept in file order; duplicate ids
/// are tolerated here and collapsed by the sampler.
#[derive(Clone, Debug)]
pub struct Corpus {
    origin: String,
    records: Vec<WordRecord>,
    dropped: usize,
}

impl Corpus {
    pub fn from_records(origin: &str, records: Vec<WordRecord>) -> Result<Self, QuizError> {
        Self::build(origin, records, 0)
    }

    fn build(origin: &str, records: Vec<WordRecord>, dropped: usize) -> Result<Self, QuizError> {
        if records.is_empty() {
            return Err(QuizError::EmptyCorpus {
                origin: origin.to_string(),
            });
        }
        Ok(Self {
            origin: origin.to_string(),
            records,
            dropped,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn records(&self) -> &[WordRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows rejected during validation.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Smallest and largest id present. Always `Some` for a built corpus.
    pub fn id_bounds(&self) -> Option<IdRange> {
        let min = self.records.iter().map(|r| r.id).min()?;
        let max = self.records.iter().map(|r| r.id).max()?;
        Some(IdRange::new(min, max))
    }

    pub fn groups(&self) -> Vec<&str> {
        let groups: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| r.group.as_deref())
            .collect();
        groups.into_iter().collect()
    }

    /// Records belonging to `group`, or every record when `group` is `None`.
    pub fn in_group(&self, group: Option<&str>) -> Vec<WordRecord> {
        match group {
            Some(g) => self
                .records
                .iter()
                .filter(|r| r.group.as_deref() == Some(g))
                .cloned()
                .collect(),
            None => self.records.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    fn to_id(&self) -> Option<u32> {
        match self {
            RawId::Int(n) => u32::try_from(*n).ok(),
            RawId::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64 => {
                Some(*f as u32)
            }
            RawId::Float(_) => None,
            RawId::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Deserialize)]
struct KeyedRow {
    #[serde(alias = "number", alias = "no")]
    id: RawId,
    #[serde(alias = "word")]
    term: String,
    meaning: String,
    #[serde(default)]
    group: Option<String>,
    #[serde(default, alias = "pos")]
    part_of_speech: Option<String>,
    #[serde(default)]
    example_source: Option<String>,
    #[serde(default)]
    example_target: Option<String>,
}

// Spreadsheet column order: number, word, part of speech, meaning.
#[derive(Deserialize)]
struct PositionalRow(RawId, String, Option<String>, String);

// Derived structs also accept sequences, so the row shape is decided from
// the document value before deserializing.
enum RawRow {
    Keyed(KeyedRow),
    Positional(PositionalRow),
}

impl RawRow {
    fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Array(_) => serde_json::from_value(value).ok().map(RawRow::Positional),
            serde_json::Value::Object(_) => serde_json::from_value(value).ok().map(RawRow::Keyed),
            _ => None,
        }
    }

    fn from_toml(value: toml::Value) -> Option<Self> {
        match value {
            toml::Value::Array(_) => value.try_into().ok().map(RawRow::Positional),
            toml::Value::Table(_) => value.try_into().ok().map(RawRow::Keyed),
            _ => None,
        }
    }

    fn into_record(self) -> Option<WordRecord> {
        let row = match self {
            RawRow::Keyed(row) => row,
            RawRow::Positional(PositionalRow(id, term, part_of_speech, meaning)) => KeyedRow {
                id,
                term,
                meaning,
                group: None,
                part_of_speech,
                example_source: None,
                example_target: None,
            },
        };

        let id = row.id.to_id()?;
        let term = row.term.trim();
        let meaning = row.meaning.trim();
        if term.is_empty() || meaning.is_empty() {
            return None;
        }
        Some(WordRecord {
            id,
            term: term.to_string(),
            meaning: meaning.to_string(),
            group: non_blank(row.group),
            part_of_speech: non_blank(row.part_of_speech),
            example_source: non_blank(row.example_source),
            example_target: non_blank(row.example_target),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDeck {
    Bare(Vec<serde_json::Value>),
    Wrapped { words: Vec<serde_json::Value> },
}

#[derive(Deserialize)]
struct TomlDeck {
    #[serde(default)]
    words: Vec<toml::Value>,
}

/// Parses deck text. Malformed rows are dropped and logged; only an
/// unreadable document or a deck with no usable rows is an error.
pub fn parse_deck(text: &str, format: DeckFormat, origin: &str) -> Result<Corpus, QuizError> {
    let unavailable = |reason: String| QuizError::SourceUnavailable {
        origin: origin.to_string(),
        reason,
    };

    let rows: Vec<Option<RawRow>> = match format {
        DeckFormat::Json => {
            let deck: JsonDeck =
                serde_json::from_str(text).map_err(|e| unavailable(e.to_string()))?;
            let values = match deck {
                JsonDeck::Bare(values) | JsonDeck::Wrapped { words: values } => values,
            };
            values
                .into_iter()
                .map(RawRow::from_json)
                .collect()
        }
        DeckFormat::Toml => {
            let deck: TomlDeck = toml::from_str(text).map_err(|e| unavailable(e.to_string()))?;
            deck.words.into_iter().map(RawRow::from_toml).collect()
        }
    };

    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0;
    for (index, row) in rows.into_iter().enumerate() {
        match row.and_then(RawRow::into_record) {
            Some(record) => records.push(record),
            None => {
                dropped += 1;
                tracing::warn!("{origin}: dropping malformed row {index}");
            }
        }
    }
    tracing::debug!(
        "{origin}: loaded {} words, dropped {dropped}",
        records.len()
    );

    Corpus::build(origin, records, dropped)
}
