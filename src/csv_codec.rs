//! CSV reading and writing for word lists and datasets.
//!
//! Every field is written quoted with embedded quotes doubled, which is the
//! only escaping applied. The reader accepts quoted and unquoted fields,
//! quoted line breaks, and `\r\n` line endings. Both sides go through
//! `csv_core`.
//!
//! Dataset column layout:
//!
//! | column        | content                                  |
//! |---------------|------------------------------------------|
//! | 0             | headword text                            |
//! | 1             | vocalization                             |
//! | 2             | transliteration                          |
//! | 3             | frequency rank                           |
//! | 4             | sequence number                          |
//! | 5 + 7k .. +6  | definition block k (k = 0..3)            |
//! | last          | CEFR level                               |

use crate::error::{ClozeError, Result};
use crate::model::{DefinitionBlock, Record, RawWord, MAX_DEFINITIONS};
use csv_core::{QuoteStyle, ReadFieldResult, Reader, Terminator, WriteResult, WriterBuilder};
use std::fs;
use std::mem;
use std::path::Path;

const COL_TEXT: usize = 0;
const COL_VOCALIZATION: usize = 1;
const COL_TRANSLITERATION: usize = 2;
const COL_FREQUENCY: usize = 3;
const COL_SEQUENCE: usize = 4;
const COL_FIRST_BLOCK: usize = 5;

/// Columns of a fully padded dataset row.
pub const DATASET_WIDTH: usize = COL_FIRST_BLOCK + MAX_DEFINITIONS * DefinitionBlock::WIDTH + 1;

/// Columns of an input word-list row:
/// `partOfSpeech, note, headwordText, cefrLevel, frequencyRank`.
pub const WORD_LIST_WIDTH: usize = 5;

/// A parsed CSV row and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

/// One newline-terminated line of comma-separated fields, every field quoted.
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .build();
    let mut line = Vec::new();
    let mut output = [0; 4096];
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            let (_, nout) = writer.delimiter(&mut output);
            line.extend_from_slice(&output[..nout]);
        }
        let mut data = field.as_ref().as_bytes();
        loop {
            let (result, nin, nout) = writer.field(data, &mut output);
            line.extend_from_slice(&output[..nout]);
            if result == WriteResult::InputEmpty {
                break;
            }
            data = &data[nin..];
        }
    }
    let (_, nout) = writer.terminator(&mut output);
    line.extend_from_slice(&output[..nout]);
    // Only ASCII quotes and delimiters are added around UTF-8 input.
    String::from_utf8_lossy(&line).into_owned()
}

/// Tracks the 1-based line of byte offsets, advancing monotonically.
struct LineCounter {
    offset: usize,
    line: usize,
}

impl LineCounter {
    fn line_at(&mut self, bytes: &[u8], offset: usize) -> usize {
        self.line += bytes[self.offset..offset].iter().filter(|&&b| b == b'\n').count();
        self.offset = offset;
        self.line
    }
}

/// Offset of the first byte at or after `pos` that is not a line break.
fn skip_line_breaks(bytes: &[u8], pos: usize) -> usize {
    pos + bytes[pos..]
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .count()
}

/// Split CSV text into rows, each tagged with the line it starts on. Blank
/// lines are skipped.
pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
    let bytes = text.as_bytes();
    let mut reader = Reader::new();
    let mut lines = LineCounter { offset: 0, line: 1 };
    let mut output = [0; 4096];
    let mut pos = 0;

    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = Vec::new();
    let mut record_line = None;

    loop {
        let line = match record_line {
            Some(line) => line,
            None => {
                let line = lines.line_at(bytes, skip_line_breaks(bytes, pos));
                record_line = Some(line);
                line
            }
        };

        let (result, nin, nout) = reader.read_field(&bytes[pos..], &mut output);
        pos += nin;
        field.extend_from_slice(&output[..nout]);
        match result {
            ReadFieldResult::InputEmpty | ReadFieldResult::OutputFull => {}
            ReadFieldResult::Field { record_end } => {
                let value = String::from_utf8(mem::take(&mut field)).map_err(|_| ClozeError::Csv {
                    line,
                    message: "field is not valid UTF-8".to_string(),
                })?;
                fields.push(value);
                if record_end {
                    let fields = mem::take(&mut fields);
                    if !(fields.len() == 1 && fields[0].is_empty()) {
                        rows.push(Row { line, fields });
                    }
                    record_line = None;
                }
            }
            ReadFieldResult::End => break,
        }
    }
    Ok(rows)
}

/// Parse a word list. The first row is a header and is discarded.
pub fn decode_word_list_str(text: &str) -> Result<Vec<RawWord>> {
    parse_rows(text)?
        .into_iter()
        .skip(1)
        .map(|row| {
            if row.fields.len() != WORD_LIST_WIDTH {
                return Err(ClozeError::FieldCount {
                    line: row.line,
                    expected: "5",
                    found: row.fields.len(),
                });
            }
            let f = |i: usize| row.fields[i].trim().to_string();
            Ok(RawWord {
                part_of_speech: f(0),
                note: f(1),
                text: f(2),
                cefr_level: f(3),
                frequency_rank: f(4),
            })
        })
        .collect()
}

pub fn decode_word_list(path: &Path) -> Result<Vec<RawWord>> {
    decode_word_list_str(&fs::read_to_string(path)?)
}

/// Number of definition blocks implied by a dataset row width.
fn block_count(width: usize) -> Option<usize> {
    let blocks = width.checked_sub(COL_FIRST_BLOCK + 1)?;
    if blocks % DefinitionBlock::WIDTH != 0 {
        return None;
    }
    let blocks = blocks / DefinitionBlock::WIDTH;
    (blocks <= MAX_DEFINITIONS).then_some(blocks)
}

pub fn record_from_row(row: &Row) -> Result<Record> {
    let fields = &row.fields;
    let blocks = block_count(fields.len()).ok_or(ClozeError::FieldCount {
        line: row.line,
        expected: "6, 13, 20 or 27",
        found: fields.len(),
    })?;

    let raw_sequence = &fields[COL_SEQUENCE];
    let sequence = raw_sequence
        .trim()
        .parse::<u64>()
        .map_err(|_| ClozeError::InvalidSequence {
            line: row.line,
            value: raw_sequence.clone(),
        })?;

    let definitions = (0..blocks)
        .map(|k| COL_FIRST_BLOCK + k * DefinitionBlock::WIDTH)
        .filter(|&start| !fields[start].is_empty())
        .map(|start| DefinitionBlock::from_fields(&fields[start..start + DefinitionBlock::WIDTH]))
        .collect();

    Ok(Record {
        text: fields[COL_TEXT].clone(),
        vocalization: fields[COL_VOCALIZATION].clone(),
        transliteration: fields[COL_TRANSLITERATION].clone(),
        frequency_rank: fields[COL_FREQUENCY].clone(),
        sequence,
        definitions,
        cefr_level: fields[fields.len() - 1].clone(),
    })
}

/// All [`DATASET_WIDTH`] columns of a record, missing blocks padded empty.
pub fn record_to_fields(record: &Record) -> Vec<String> {
    let mut fields = Vec::with_capacity(DATASET_WIDTH);
    fields.push(record.text.clone());
    fields.push(record.vocalization.clone());
    fields.push(record.transliteration.clone());
    fields.push(record.frequency_rank.clone());
    fields.push(record.sequence.to_string());
    for block in record.definitions.iter().take(MAX_DEFINITIONS) {
        fields.extend(block.clone().into_fields());
    }
    fields.resize(DATASET_WIDTH - 1, String::new());
    fields.push(record.cefr_level.clone());
    fields
}

pub fn encode_record(record: &Record) -> String {
    encode_row(&record_to_fields(record))
}

pub fn decode_dataset_str(text: &str) -> Result<Vec<Record>> {
    parse_rows(text)?.iter().map(record_from_row).collect()
}

pub fn decode_dataset(path: &Path) -> Result<Vec<Record>> {
    decode_dataset_str(&fs::read_to_string(path)?)
}
