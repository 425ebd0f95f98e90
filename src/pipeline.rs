//! Sequential build of a dataset from a word list.

use crate::consensus::ConsensusResolver;
use crate::dataset::{AppendOutcome, DatasetWriter};
use crate::error::{ClozeError, Result};
use crate::lookup::LookupClient;
use crate::model::RawWord;
use indicatif::ProgressBar;
use log::warn;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub words_seen: usize,
    pub written: usize,
    pub duplicates: usize,
    pub no_definitions: usize,
    /// Words abandoned because a lookup or their markup failed.
    pub failed: usize,
    pub first_sequence: Option<u64>,
    pub last_sequence: Option<u64>,
    pub elapsed: Duration,
}

/// Append every word of `words` (at most `limit` of them) in input order.
///
/// A failing word is logged and counted, and the run moves on; only an I/O
/// error on the dataset itself stops it.
pub fn run<C: LookupClient>(
    words: Vec<RawWord>,
    writer: &mut DatasetWriter,
    client: &C,
    resolver: &ConsensusResolver,
    limit: Option<usize>,
    pb: &ProgressBar,
) -> Result<RunStats> {
    let start_time = Instant::now();
    let mut stats = RunStats::default();
    let take = limit.unwrap_or(words.len());

    for raw in words.into_iter().take(take) {
        stats.words_seen += 1;
        pb.set_message(raw.text.clone());
        let text = raw.text.clone();

        match writer.append(raw, client, resolver) {
            Ok(AppendOutcome::Written(sequence)) => {
                stats.written += 1;
                stats.first_sequence.get_or_insert(sequence);
                stats.last_sequence = Some(sequence);
            }
            Ok(AppendOutcome::Duplicate) => stats.duplicates += 1,
            Ok(AppendOutcome::NoDefinitions) => stats.no_definitions += 1,
            Err(ClozeError::Io(e)) => return Err(ClozeError::Io(e)),
            Err(e) => {
                warn!("Skipping {}: {}", text, e);
                stats.failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    stats.elapsed = start_time.elapsed();
    Ok(stats)
}
