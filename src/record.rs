//! Flattening resolved words into dataset records.

use crate::error::Result;
use crate::markup::Markup;
use crate::model::{Definition, DefinitionBlock, Record, ResolvedWord, MAX_DEFINITIONS};

/// Replace the highlighted span of `example` with a numbered cloze deletion
/// holding the span's text: `{{c2::قمر}}`.
pub fn cloze_text(example: &Markup, ordinal: usize) -> Result<String> {
    let hidden = example.highlighted_text()?;
    example.replace_highlighted_span(&format!("{{{{c{}::{}}}}}", ordinal, hidden))
}

fn markup(m: Option<&Markup>) -> String {
    m.map(|m| m.as_str().to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordBuilder;

impl RecordBuilder {
    /// Block for the definition at 1-based position `ordinal`.
    pub fn block(definition: &Definition, ordinal: usize) -> Result<DefinitionBlock> {
        let reading = definition.reading();
        let cloze = match &definition.example {
            Some(example) => cloze_text(example, ordinal)?,
            None => String::new(),
        };
        Ok(DefinitionBlock {
            headword: definition.headword.clone(),
            part_of_speech: definition.part_of_speech.clone(),
            example: markup(definition.example.as_ref()),
            example_vocalization: markup(reading.map(|r| &r.vocalization)),
            example_transliteration: markup(reading.map(|r| &r.transliteration)),
            cloze,
            example_translation: markup(definition.example_translation.as_ref()),
        })
    }

    /// Record for `word` with the given sequence number. Only the first
    /// [`MAX_DEFINITIONS`] definitions are kept.
    pub fn build(word: &ResolvedWord, sequence: u64) -> Result<Record> {
        let definitions = word
            .definitions
            .iter()
            .take(MAX_DEFINITIONS)
            .enumerate()
            .map(|(i, def)| Self::block(def, i + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(Record {
            text: word.word.text.clone(),
            vocalization: word.vocalization.clone(),
            transliteration: word.transliteration.clone(),
            frequency_rank: word.word.frequency_rank.clone(),
            sequence,
            definitions,
            cefr_level: word.word.cefr_level.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExampleReading, RawDefinition, RawWord};

    fn sel(text: &str) -> Markup {
        Markup::new(format!(r#"رأيت <span class="sel">{}</span> الليلة"#, text))
    }

    fn definition(example: Option<&str>) -> Definition {
        let raw = RawDefinition {
            headword: "قَمَر".to_string(),
            part_of_speech: "n".to_string(),
            example: example.map(sel),
            example_translation: example.map(|_| Markup::from("I saw the <span class=\"sel\">moon</span> tonight")),
        };
        let reading = example.map(|_| ExampleReading {
            vocalization: sel("القَمَرَ"),
            transliteration: sel("al-qamara"),
        });
        Definition::new(raw, reading).unwrap()
    }

    fn word(definitions: Vec<Definition>) -> ResolvedWord {
        ResolvedWord {
            word: RawWord {
                text: "قمر".to_string(),
                part_of_speech: "noun".to_string(),
                cefr_level: "A2".to_string(),
                frequency_rank: "830".to_string(),
                note: String::new(),
            },
            vocalization: "قَمَر".to_string(),
            transliteration: "qamar".to_string(),
            definitions,
        }
    }

    #[test]
    fn cloze_uses_ordinal_and_span_text() {
        let cloze = cloze_text(&sel("قمر"), 2).unwrap();
        assert_eq!(cloze, "رأيت {{c2::قمر}} الليلة");
        assert_eq!(cloze.matches("{{c").count(), 1);
    }

    #[test]
    fn second_definition_gets_c2() {
        let w = word(vec![definition(Some("قمرا")), definition(Some("قمر"))]);
        let record = RecordBuilder::build(&w, 7).unwrap();
        assert!(record.definitions[1].cloze.contains("{{c2::قمر}}"));
        assert!(!record.definitions[1].cloze.contains("{{c1::"));
        assert!(record.definitions[0].cloze.contains("{{c1::قمرا}}"));
    }

    #[test]
    fn definition_without_example_has_empty_fields() {
        let block = RecordBuilder::block(&definition(None), 1).unwrap();
        assert_eq!(block.headword, "قَمَر");
        assert_eq!(block.example, "");
        assert_eq!(block.example_vocalization, "");
        assert_eq!(block.cloze, "");
        assert_eq!(block.example_translation, "");
    }

    #[test]
    fn keeps_only_three_definitions() {
        let defs = (0..5).map(|_| definition(Some("قمر"))).collect();
        let record = RecordBuilder::build(&word(defs), 1).unwrap();
        assert_eq!(record.definitions.len(), 3);
        assert!(record.definitions[2].cloze.contains("{{c3::"));
    }

    #[test]
    fn word_level_fields_are_copied() {
        let record = RecordBuilder::build(&word(vec![definition(None)]), 42).unwrap();
        assert_eq!(record.text, "قمر");
        assert_eq!(record.vocalization, "قَمَر");
        assert_eq!(record.transliteration, "qamar");
        assert_eq!(record.frequency_rank, "830");
        assert_eq!(record.cefr_level, "A2");
        assert_eq!(record.sequence, 42);
    }
}
