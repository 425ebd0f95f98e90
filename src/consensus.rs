//! Vote between vocalizations of the same headword.
//!
//! The transliteration service is less reliable on a bare word than on a
//! full sentence, so each definition whose example highlights exactly the
//! headword contributes its own reading of that word. Candidates are grouped
//! by exact string; the groups then go through an elimination vote in which
//! final diacritics are ignored when checking for agreement.

use crate::config::VotingWeights;
use crate::diacritics::strip_trailing_diacritic;
use crate::error::{ClozeError, Result};
use crate::model::Definition;
use log::debug;

/// Where a vocalization candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteSource {
    /// The headword's own lookup.
    Headword,
    /// The example of the definition at this index.
    Example(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub vocalization: String,
    pub weight: u32,
    pub source: VoteSource,
}

/// Candidates sharing one exact vocalization. `source` is the first member's.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bucket {
    vocalization: String,
    votes: u32,
    source: VoteSource,
}

/// Outcome of a vote that changed something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consensus {
    pub vocalization: String,
    /// Set when the winner came from an example: that example's highlighted
    /// transliteration.
    pub transliteration: Option<String>,
    pub source: VoteSource,
}

#[derive(Debug, Clone, Default)]
pub struct ConsensusResolver {
    weights: VotingWeights,
}

impl ConsensusResolver {
    pub fn new(weights: VotingWeights) -> Self {
        Self { weights }
    }

    /// The headword's vocalization first, then one candidate per definition
    /// whose example highlights exactly `word_text`, in definition order.
    pub fn candidates(
        &self,
        word_text: &str,
        headword_vocalization: &str,
        definitions: &[Definition],
    ) -> Result<Vec<Candidate>> {
        let mut candidates = vec![Candidate {
            vocalization: headword_vocalization.to_string(),
            weight: self.weights.headword_weight,
            source: VoteSource::Headword,
        }];

        for (index, definition) in definitions.iter().enumerate() {
            let example = match &definition.example {
                Some(example) if !example.is_empty() => example,
                _ => continue,
            };
            if example.highlighted_text()? != word_text {
                continue;
            }
            let reading = definition
                .reading()
                .ok_or_else(|| ClozeError::MissingReading {
                    headword: definition.headword.clone(),
                })?;
            candidates.push(Candidate {
                vocalization: reading.vocalization.highlighted_text()?,
                weight: self.weights.example_weight,
                source: VoteSource::Example(index),
            });
        }

        Ok(candidates)
    }

    /// Run the vote for one word.
    ///
    /// Returns `Ok(None)` when every candidate agrees exactly (including the
    /// case where no example qualified): the headword's own result stands.
    pub fn resolve(
        &self,
        word_text: &str,
        headword_vocalization: &str,
        definitions: &[Definition],
    ) -> Result<Option<Consensus>> {
        let candidates = self.candidates(word_text, headword_vocalization, definitions)?;
        let (vocalization, source) = match elect(&candidates) {
            Some(winner) => winner,
            None => {
                debug!("{}: {} candidate(s) agree, no vote", word_text, candidates.len());
                return Ok(None);
            }
        };

        let transliteration = match source {
            VoteSource::Headword => None,
            VoteSource::Example(index) => {
                let reading = definitions
                    .get(index)
                    .and_then(Definition::reading)
                    .ok_or_else(|| ClozeError::MissingReading {
                        headword: word_text.to_string(),
                    })?;
                Some(reading.transliteration.highlighted_text()?)
            }
        };

        debug!(
            "{}: {} candidates, elected {} from {:?}",
            word_text,
            candidates.len(),
            vocalization,
            source
        );
        Ok(Some(Consensus {
            vocalization,
            transliteration,
            source,
        }))
    }
}

fn group(candidates: &[Candidate]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    for candidate in candidates {
        match buckets
            .iter_mut()
            .find(|b| b.vocalization == candidate.vocalization)
        {
            Some(bucket) => bucket.votes += candidate.weight,
            None => buckets.push(Bucket {
                vocalization: candidate.vocalization.clone(),
                votes: candidate.weight,
                source: candidate.source,
            }),
        }
    }
    buckets
}

/// Elimination vote. `None` if there is only one distinct vocalization.
///
/// Buckets are ordered by `(votes, vocalization)`. Each round compares the
/// survivors with their final diacritic stripped; if they all agree, or only
/// two are left, the last (strongest) survivor wins. Otherwise the weakest
/// is dropped and the next round starts from the survivors' original strings.
pub fn elect(candidates: &[Candidate]) -> Option<(String, VoteSource)> {
    let mut buckets = group(candidates);
    if buckets.len() < 2 {
        return None;
    }
    buckets.sort_by(|a, b| {
        a.votes
            .cmp(&b.votes)
            .then_with(|| a.vocalization.cmp(&b.vocalization))
    });

    let mut survivors = &buckets[..];
    loop {
        let mut stripped = survivors
            .iter()
            .map(|b| strip_trailing_diacritic(&b.vocalization));
        let first = stripped.next();
        let agree = stripped.all(|s| Some(s) == first);

        if agree || survivors.len() <= 2 {
            let winner = survivors.last()?;
            return Some((winner.vocalization.clone(), winner.source));
        }
        survivors = &survivors[1..];
    }
}
