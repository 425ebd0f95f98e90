//! Resumable, append-only dataset file.
//!
//! The dataset is a single-writer log: one CSV line per word, never
//! rewritten in place. Opening it recovers the set of headwords already
//! written and the highest sequence number, so a run over a growing word
//! list picks up where the last one stopped.

use crate::consensus::ConsensusResolver;
use crate::csv_codec::{decode_dataset_str, encode_record};
use crate::error::{ClozeError, Result};
use crate::lookup::LookupClient;
use crate::model::{RawWord, ResolvedWord};
use crate::record::RecordBuilder;
use crate::resolve::resolve_word;
use log::{debug, info};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What [`DatasetWriter::append`] did with a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// A row was written with this sequence number.
    Written(u64),
    /// The headword already has a row; the stored row wins.
    Duplicate,
    /// The lookup found no definitions; nothing written, no number used.
    NoDefinitions,
}

#[derive(Debug)]
pub struct DatasetWriter {
    path: PathBuf,
    written: HashSet<String>,
    last_sequence: u64,
    /// The file ends without a line break (e.g. hand-edited).
    needs_newline: bool,
}

impl DatasetWriter {
    /// Read the dataset at `path` to recover the resume state. A missing
    /// file is an empty dataset; a malformed one is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let records = decode_dataset_str(&contents)?;
        let last_sequence = records.iter().map(|r| r.sequence).max().unwrap_or(0);
        let written: HashSet<String> = records.into_iter().map(|r| r.text).collect();
        debug!(
            "{}: {} words written, last sequence {}",
            path.display(),
            written.len(),
            last_sequence
        );

        Ok(DatasetWriter {
            path,
            written,
            last_sequence,
            needs_newline: !contents.is_empty() && !contents.ends_with('\n'),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, text: &str) -> bool {
        self.written.contains(text)
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Number of distinct headwords in the dataset.
    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    /// Resolve `raw` through `client` and append it, unless it is already
    /// written (checked before any lookup) or has no definitions.
    pub fn append<C: LookupClient>(
        &mut self,
        raw: RawWord,
        client: &C,
        resolver: &ConsensusResolver,
    ) -> Result<AppendOutcome> {
        if self.contains(&raw.text) {
            info!("Already written {}", raw.text);
            return Ok(AppendOutcome::Duplicate);
        }
        let word = resolve_word(raw, client, resolver)?;
        self.append_resolved(&word)
    }

    /// Append an already resolved word.
    pub fn append_resolved(&mut self, word: &ResolvedWord) -> Result<AppendOutcome> {
        let text = &word.word.text;
        if self.contains(text) {
            info!("Already written {}", text);
            return Ok(AppendOutcome::Duplicate);
        }
        if word.definitions.is_empty() {
            info!("No definitions for {}, skipping", text);
            return Ok(AppendOutcome::NoDefinitions);
        }

        let sequence = self
            .last_sequence
            .checked_add(1)
            .ok_or(ClozeError::SequenceExhausted {
                last: self.last_sequence,
            })?;
        let record = RecordBuilder::build(word, sequence)?;
        let mut line = encode_record(&record);
        if self.needs_newline {
            line.insert(0, '\n');
        }
        self.write_line(&line)?;

        self.needs_newline = false;
        self.last_sequence = sequence;
        self.written.insert(text.clone());
        Ok(AppendOutcome::Written(sequence))
    }

    /// The whole line goes out in one write so an interrupted run leaves only
    /// complete rows behind.
    fn write_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

/// Copy the dataset at `input` to `output` with every sequence number
/// shifted by `offset`. `output` is replaced atomically and may be `input`.
/// Returns the number of records written.
pub fn renumber(input: &Path, output: &Path, offset: i64) -> Result<usize> {
    let mut records = decode_dataset_str(&fs::read_to_string(input)?)?;
    for record in &mut records {
        let shifted = i128::from(record.sequence) + i128::from(offset);
        record.sequence = u64::try_from(shifted)
            .ok()
            .filter(|&s| s >= 1)
            .ok_or(ClozeError::SequenceOutOfRange {
                sequence: record.sequence,
                offset,
            })?;
    }

    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        for record in &records {
            writer.write_all(encode_record(record).as_bytes())?;
        }
        writer.flush()?;
    }
    temp.persist(output).map_err(|e| ClozeError::Io(e.error))?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_codec::decode_dataset;
    use crate::markup::Markup;
    use crate::model::{Definition, RawDefinition};
    use tempfile::tempdir;

    fn word(text: &str, definitions: usize) -> ResolvedWord {
        let definitions = (0..definitions)
            .map(|_| {
                Definition::new(
                    RawDefinition {
                        headword: text.to_string(),
                        part_of_speech: "n".to_string(),
                        example: None,
                        example_translation: Some(Markup::from("gloss")),
                    },
                    None,
                )
                .unwrap()
            })
            .collect();
        ResolvedWord {
            word: RawWord {
                text: text.to_string(),
                part_of_speech: "noun".to_string(),
                cefr_level: "B1".to_string(),
                frequency_rank: "100".to_string(),
                note: String::new(),
            },
            vocalization: text.to_string(),
            transliteration: "x".to_string(),
            definitions,
        }
    }

    #[test]
    fn missing_file_is_empty_dataset() {
        let dir = tempdir().unwrap();
        let writer = DatasetWriter::open(dir.path().join("out.csv")).unwrap();
        assert!(writer.is_empty());
        assert_eq!(writer.last_sequence(), 0);
    }

    #[test]
    fn sequence_numbers_increase() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = DatasetWriter::open(&path).unwrap();
        assert_eq!(writer.append_resolved(&word("قمر", 1)).unwrap(), AppendOutcome::Written(1));
        assert_eq!(writer.append_resolved(&word("شمس", 2)).unwrap(), AppendOutcome::Written(2));

        let records = decode_dataset(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].sequence, 2);
        assert_eq!(records[1].definitions.len(), 2);
    }

    #[test]
    fn duplicate_is_skipped_in_same_and_later_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = DatasetWriter::open(&path).unwrap();
        writer.append_resolved(&word("قمر", 1)).unwrap();
        assert_eq!(writer.append_resolved(&word("قمر", 1)).unwrap(), AppendOutcome::Duplicate);

        let mut reopened = DatasetWriter::open(&path).unwrap();
        assert_eq!(reopened.append_resolved(&word("قمر", 3)).unwrap(), AppendOutcome::Duplicate);
        assert_eq!(reopened.last_sequence(), 1);
        assert_eq!(decode_dataset(&path).unwrap().len(), 1);
    }

    #[test]
    fn no_definitions_consumes_no_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = DatasetWriter::open(&path).unwrap();
        assert_eq!(writer.append_resolved(&word("و", 0)).unwrap(), AppendOutcome::NoDefinitions);
        assert!(!path.exists());
        assert_eq!(writer.append_resolved(&word("قمر", 1)).unwrap(), AppendOutcome::Written(1));
    }

    #[test]
    fn resumes_from_maximum_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        {
            let mut writer = DatasetWriter::open(&path).unwrap();
            writer.append_resolved(&word("قمر", 1)).unwrap();
            writer.append_resolved(&word("شمس", 1)).unwrap();
        }
        renumber(&path, &path, 40).unwrap();
        let mut writer = DatasetWriter::open(&path).unwrap();
        assert_eq!(writer.last_sequence(), 42);
        assert_eq!(writer.append_resolved(&word("نجم", 1)).unwrap(), AppendOutcome::Written(43));
    }

    #[test]
    fn exhausted_sequence_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let record = RecordBuilder::build(&word("قمر", 1), u64::MAX).unwrap();
        fs::write(&path, encode_record(&record)).unwrap();
        let before = fs::read(&path).unwrap();

        let mut writer = DatasetWriter::open(&path).unwrap();
        assert_eq!(writer.last_sequence(), u64::MAX);
        assert!(matches!(
            writer.append_resolved(&word("شمس", 1)),
            Err(ClozeError::SequenceExhausted { last: u64::MAX })
        ));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(!writer.contains("شمس"));
    }

    #[test]
    fn appends_after_unterminated_last_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut line = encode_record(&RecordBuilder::build(&word("قمر", 1), 5).unwrap());
        line.pop();
        fs::write(&path, line).unwrap();

        let mut writer = DatasetWriter::open(&path).unwrap();
        writer.append_resolved(&word("شمس", 1)).unwrap();
        let records = decode_dataset(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].sequence, 6);
    }

    #[test]
    fn malformed_dataset_refuses_to_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "\"a\",\"b\"\n").unwrap();
        assert!(matches!(
            DatasetWriter::open(&path),
            Err(ClozeError::FieldCount { .. })
        ));
    }

    #[test]
    fn renumber_refuses_to_go_below_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = DatasetWriter::open(&path).unwrap();
        writer.append_resolved(&word("قمر", 1)).unwrap();
        let out = dir.path().join("shifted.csv");
        assert!(matches!(
            renumber(&path, &out, -1),
            Err(ClozeError::SequenceOutOfRange { sequence: 1, offset: -1 })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn renumber_refuses_to_overflow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let record = RecordBuilder::build(&word("قمر", 1), u64::MAX - 1).unwrap();
        fs::write(&path, encode_record(&record)).unwrap();
        assert!(matches!(
            renumber(&path, &path, 2),
            Err(ClozeError::SequenceOutOfRange { offset: 2, .. })
        ));
        assert_eq!(decode_dataset(&path).unwrap()[0].sequence, u64::MAX - 1);
    }
}
