//! # arabic-cloze-builder
//!
//! Builds an Arabic vocabulary flashcard dataset: each headword of a word
//! list gets a vocalization and transliteration settled by voting, plus up to
//! three dictionary definitions with example sentences and cloze deletions.
//! Output is a CSV file that is only ever appended to, so repeated runs over
//! a growing word list resume where the previous one stopped.

pub mod audio;
pub mod config;
pub mod consensus;
pub mod csv_codec;
pub mod dataset;
pub mod diacritics;
pub mod error;
pub mod lookup;
pub mod markup;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod resolve;

pub use config::BuilderConfig;
pub use consensus::{Consensus, ConsensusResolver, VoteSource};
pub use dataset::{AppendOutcome, DatasetWriter};
pub use error::{ClozeError, Result};
pub use lookup::{JsonLookupClient, LookupClient, Transliteration};
pub use markup::Markup;
pub use model::{Definition, DefinitionBlock, ExampleReading, RawDefinition, RawWord, Record, ResolvedWord};
pub use record::RecordBuilder;
pub use resolve::resolve_word;
