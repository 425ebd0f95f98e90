//! Audio file naming for spoken headwords and examples.
//!
//! Two schemes exist. `Base64` encodes the Arabic text itself and can be
//! reversed; `Readable` is built from the romanization and cannot.

use crate::config::{AudioConfig, AudioScheme};
use crate::diacritics::romanized_to_ascii;
use crate::error::{ClozeError, Result};
use crate::markup::Markup;
use crate::model::Record;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

lazy_static! {
    static ref BASE64_FILENAME: Regex = Regex::new(r"^ar_([A-Za-z0-9_=-]*)\.mp3$").unwrap();
}

/// `ar_<base64url(text)>.mp3`
pub fn base64_filename(text: &str) -> String {
    format!("ar_{}.mp3", URL_SAFE.encode(text.as_bytes()))
}

/// Inverse of [`base64_filename`]. Accepts a bare filename or a path.
pub fn text_from_base64_filename(filename: &str) -> Result<String> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    let cap = BASE64_FILENAME
        .captures(name)
        .ok_or_else(|| ClozeError::InvalidFilename(filename.to_string()))?;
    let bytes = URL_SAFE.decode(&cap[1])?;
    Ok(String::from_utf8(bytes)?)
}

/// `ar_<ascii>.mp3`: the first `max_words` space-separated words of the
/// ASCII romanization, joined with hyphens, keeping only `[A-Za-z0-9-]`.
pub fn readable_filename(transliteration: &str, max_words: usize) -> String {
    let ascii = romanized_to_ascii(transliteration);
    let joined = ascii.split(' ').take(max_words).collect::<Vec<_>>().join("-");
    let sanitized: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    format!("ar_{}.mp3", sanitized)
}

pub fn audio_filename(text: &str, transliteration: &str, config: &AudioConfig) -> String {
    match config.scheme {
        AudioScheme::Base64 => base64_filename(text),
        AudioScheme::Readable => readable_filename(transliteration, config.words_in_filename),
    }
}

/// One audio file a dataset needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioEntry {
    pub text: String,
    pub transliteration: String,
    pub filename: String,
}

/// Audio files needed by `records`: each headword, then each example, in
/// dataset order. Filenames already listed, or already present in
/// `media_dir`, are left out.
pub fn audio_manifest(
    records: &[Record],
    config: &AudioConfig,
    media_dir: Option<&Path>,
) -> Vec<AudioEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for record in records {
        let mut pairs = vec![(
            record.text.clone(),
            Markup::new(record.transliteration.as_str()).plain_text(),
        )];
        for block in &record.definitions {
            if block.example.is_empty() {
                continue;
            }
            pairs.push((
                Markup::new(block.example.as_str()).plain_text(),
                Markup::new(block.example_transliteration.as_str()).plain_text(),
            ));
        }

        for (text, transliteration) in pairs {
            let filename = audio_filename(&text, &transliteration, config);
            if !seen.insert(filename.clone()) {
                continue;
            }
            if media_dir.is_some_and(|dir| dir.join(&filename).exists()) {
                debug!("Found file {}", filename);
                continue;
            }
            entries.push(AudioEntry {
                text,
                transliteration,
                filename,
            });
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DefinitionBlock;

    #[test]
    fn base64_scheme_reverses() {
        let text = "طلع القمر في السماء";
        let name = base64_filename(text);
        assert!(name.starts_with("ar_"));
        assert!(name.ends_with(".mp3"));
        assert!(!name.contains('/') && !name.contains('+'));
        assert_eq!(text_from_base64_filename(&name).unwrap(), text);
        assert_eq!(
            text_from_base64_filename(&format!("/media/{}", name)).unwrap(),
            text
        );
    }

    #[test]
    fn base64_of_known_text() {
        // "ab?" is YWI/ in standard base64
        assert_eq!(base64_filename("ab?"), "ar_YWI_.mp3");
    }

    #[test]
    fn non_audio_names_are_rejected() {
        assert!(matches!(
            text_from_base64_filename("notes.txt"),
            Err(ClozeError::InvalidFilename(_))
        ));
    }

    #[test]
    fn readable_scheme_keeps_seven_words() {
        let translit = "ḏahaba al-walad ilā al-madrasa fī al-ṣabāḥ maʿa ʾaḫīhi";
        let name = readable_filename(translit, 7);
        assert_eq!(
            name,
            "ar_dahaba-al-walad-ilaa-al-madrasa-fii-al-SabaaH-ma3a.mp3"
        );
    }

    #[test]
    fn readable_scheme_strips_punctuation() {
        assert_eq!(readable_filename("qamar, kabīr!", 7), "ar_qamar-kabiir.mp3");
    }

    #[test]
    fn manifest_lists_headword_and_examples_once() {
        let block = |example: &str| DefinitionBlock {
            headword: "قمر".to_string(),
            example: example.to_string(),
            example_transliteration: r#"raʾaytu <span class="sel">qamar</span>"#.to_string(),
            ..Default::default()
        };
        let record = Record {
            text: "قمر".to_string(),
            vocalization: "قَمَر".to_string(),
            transliteration: "qamar".to_string(),
            frequency_rank: "1".to_string(),
            sequence: 1,
            definitions: vec![
                block(r#"رأيت <span class="sel">قمر</span>"#),
                block(""),
                block(r#"رأيت <span class="sel">قمر</span>"#),
            ],
            cefr_level: "A1".to_string(),
        };
        let config = AudioConfig {
            scheme: AudioScheme::Base64,
            words_in_filename: 7,
        };
        let entries = audio_manifest(&[record], &config, None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "قمر");
        assert_eq!(entries[1].text, "رأيت قمر");
        assert_eq!(entries[1].transliteration, "raʾaytu qamar");
    }
}
