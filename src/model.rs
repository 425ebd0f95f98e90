//! Words, definitions and persisted records.
//!
//! A word moves through two explicit states: [`RawWord`] as read from the
//! word list, and [`ResolvedWord`] once vocalization, transliteration and
//! definitions have been fetched and reconciled. A [`Record`] is the flat,
//! persisted view of a resolved word plus its sequence number.

use crate::error::{ClozeError, Result};
use crate::markup::Markup;
use serde::{Deserialize, Serialize};

/// Definitions kept per record.
pub const MAX_DEFINITIONS: usize = 3;

/// A headword as read from the input word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWord {
    pub text: String,
    pub part_of_speech: String,
    pub cefr_level: String,
    pub frequency_rank: String,
    pub note: String,
}

/// One dictionary sense, as returned by the definition lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDefinition {
    pub headword: String,
    #[serde(rename = "pos")]
    pub part_of_speech: String,
    #[serde(default)]
    pub example: Option<Markup>,
    #[serde(default)]
    pub example_translation: Option<Markup>,
}

/// Vocalization and transliteration of an example sentence. Both markups
/// highlight the span aligned with the example's own highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleReading {
    pub vocalization: Markup,
    pub transliteration: Markup,
}

/// A dictionary sense whose example (if any) has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub headword: String,
    pub part_of_speech: String,
    pub example: Option<Markup>,
    pub example_translation: Option<Markup>,
    reading: Option<ExampleReading>,
}

impl Definition {
    /// Pair a raw definition with its example reading.
    ///
    /// Fails if the headword is blank, or if the reading is missing for a
    /// non-empty example. A reading supplied for a definition without
    /// example is discarded.
    pub fn new(raw: RawDefinition, reading: Option<ExampleReading>) -> Result<Self> {
        if raw.headword.trim().is_empty() {
            return Err(ClozeError::EmptyHeadword);
        }
        let example = raw.example.filter(|e| !e.is_empty());
        let reading = match (&example, reading) {
            (Some(_), Some(reading)) => Some(reading),
            (Some(_), None) => {
                return Err(ClozeError::MissingReading {
                    headword: raw.headword,
                })
            }
            (None, _) => None,
        };
        Ok(Definition {
            headword: raw.headword,
            part_of_speech: raw.part_of_speech,
            example,
            example_translation: raw.example_translation,
            reading,
        })
    }

    /// Present exactly when `example` is.
    pub fn reading(&self) -> Option<&ExampleReading> {
        self.reading.as_ref()
    }
}

/// A word with vocalization, transliteration and definitions settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWord {
    pub word: RawWord,
    pub vocalization: String,
    pub transliteration: String,
    /// Source relevance order, most relevant first.
    pub definitions: Vec<Definition>,
}

/// One 7-column definition block of a persisted record. Absent values are
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionBlock {
    pub headword: String,
    pub part_of_speech: String,
    pub example: String,
    pub example_vocalization: String,
    pub example_transliteration: String,
    pub cloze: String,
    pub example_translation: String,
}

impl DefinitionBlock {
    pub const WIDTH: usize = 7;

    pub fn into_fields(self) -> [String; 7] {
        [
            self.headword,
            self.part_of_speech,
            self.example,
            self.example_vocalization,
            self.example_transliteration,
            self.cloze,
            self.example_translation,
        ]
    }

    pub fn from_fields(fields: &[String]) -> Self {
        let get = |i: usize| fields.get(i).cloned().unwrap_or_default();
        DefinitionBlock {
            headword: get(0),
            part_of_speech: get(1),
            example: get(2),
            example_vocalization: get(3),
            example_transliteration: get(4),
            cloze: get(5),
            example_translation: get(6),
        }
    }
}

/// A persisted dataset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub text: String,
    pub vocalization: String,
    pub transliteration: String,
    pub frequency_rank: String,
    pub sequence: u64,
    /// At most [`MAX_DEFINITIONS`] blocks, in source order.
    pub definitions: Vec<DefinitionBlock>,
    pub cefr_level: String,
}
