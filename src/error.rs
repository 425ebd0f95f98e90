//! Error types shared by every stage of the dataset builder.

use thiserror::Error;

/// The error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum ClozeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV field could not be decoded.
    #[error("CSV error on line {line}: {message}")]
    Csv { line: usize, message: String },

    /// A row does not match the documented column layout.
    #[error("Field count mismatch on line {line}: expected {expected}, found {found}")]
    FieldCount {
        line: usize,
        expected: &'static str,
        found: usize,
    },

    #[error("Invalid sequence number on line {line}: {value:?}")]
    InvalidSequence { line: usize, value: String },

    /// Markup that should carry a `class="sel"` span has none.
    #[error("No highlighted span in markup: {0}")]
    MissingHighlight(String),

    #[error("Expected exactly one highlighted span, found {count}: {markup}")]
    MultipleHighlights { count: usize, markup: String },

    /// A definition with an example reached voting or serialization before
    /// its example reading was fetched.
    #[error("Example of definition {headword:?} has no vocalization/transliteration")]
    MissingReading { headword: String },

    #[error("Lookup failed: {0}")]
    Lookup(String),

    #[error("Lookup has no {kind} for {key:?}")]
    LookupMissing { kind: &'static str, key: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Not an audio filename: {0}")]
    InvalidFilename(String),

    #[error("Base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Decoded text is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Sequence number {sequence} shifted by {offset} leaves the range 1..=u64::MAX")]
    SequenceOutOfRange { sequence: u64, offset: i64 },

    /// The dataset already holds the largest representable sequence number.
    #[error("No sequence number left after {last}")]
    SequenceExhausted { last: u64 },

    /// A dictionary sense came back without a headword; its block would not
    /// survive a read back.
    #[error("Definition has an empty headword")]
    EmptyHeadword,
}

/// A convenience `Result` type alias using [`ClozeError`].
pub type Result<T> = std::result::Result<T, ClozeError>;
