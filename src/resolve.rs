//! Turning a raw word into a resolved one through the lookup service.

use crate::consensus::ConsensusResolver;
use crate::error::{ClozeError, Result};
use crate::lookup::LookupClient;
use crate::model::{Definition, ExampleReading, RawWord, ResolvedWord};
use log::{debug, info, warn};

fn client_error(e: ClozeError) -> ClozeError {
    match e {
        ClozeError::Io(e) => ClozeError::Lookup(e.to_string()),
        e => e,
    }
}

/// Fetch everything a word needs and settle its vocalization.
///
/// Issues one transliteration call for the headword, one definition lookup,
/// and one transliteration call per definition with an example. The first
/// failing call aborts the word. Client I/O failures come back as
/// [`ClozeError::Lookup`], so [`ClozeError::Io`] always means the dataset.
/// Senses without a headword are dropped.
pub fn resolve_word<C: LookupClient>(
    raw: RawWord,
    client: &C,
    resolver: &ConsensusResolver,
) -> Result<ResolvedWord> {
    info!("Looking up {}", raw.text);
    let headword = client.transliterate(&raw.text).map_err(client_error)?;
    let raw_definitions = client.lookup_definitions(&raw.text).map_err(client_error)?;
    debug!("{}: {} definitions", raw.text, raw_definitions.len());

    let mut definitions = Vec::with_capacity(raw_definitions.len());
    for raw_definition in raw_definitions {
        if raw_definition.headword.trim().is_empty() {
            warn!("{}: dropping a {} sense with no headword", raw.text, raw_definition.part_of_speech);
            continue;
        }
        let reading = match raw_definition.example.as_ref().filter(|e| !e.is_empty()) {
            Some(example) => {
                let t = client.transliterate(example.as_str()).map_err(client_error)?;
                Some(ExampleReading {
                    vocalization: t.vocalization,
                    transliteration: t.transliteration,
                })
            }
            None => None,
        };
        definitions.push(Definition::new(raw_definition, reading)?);
    }

    let mut vocalization = headword.vocalization.as_str().to_string();
    let mut transliteration = headword.transliteration.as_str().to_string();
    if let Some(consensus) = resolver.resolve(&raw.text, &vocalization, &definitions)? {
        if consensus.vocalization != vocalization {
            info!(
                "{}: vocalization {} -> {}",
                raw.text, vocalization, consensus.vocalization
            );
        }
        vocalization = consensus.vocalization;
        if let Some(t) = consensus.transliteration {
            transliteration = t;
        }
    }

    Ok(ResolvedWord {
        word: raw,
        vocalization,
        transliteration,
        definitions,
    })
}
