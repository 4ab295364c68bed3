//! Cross-field accumulation of per-source candidate lists.

use std::collections::HashMap;

use crate::similarity::{Candidate, MAX_RELATED};

/// Accumulates candidate lists produced across auxiliary fields.
///
/// Per source identity, each target keeps the best score seen in any field
/// processed so far. The accumulator is owned by one pipeline run and
/// consumed by [`RelatedAccumulator::finalize`].
#[derive(Debug, Default)]
pub struct RelatedAccumulator {
    by_source: HashMap<String, HashMap<String, f32>>,
}

impl RelatedAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sources registered so far.
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    pub fn contains(&self, source: &str) -> bool {
        self.by_source.contains_key(source)
    }

    /// Fold one field's candidate list for `source` into the accumulator.
    ///
    /// The source is registered even when `candidates` is empty, so it still
    /// produces an output record. On a repeated target the higher score wins.
    pub fn add(&mut self, source: &str, candidates: Vec<Candidate>) {
        let targets = self.by_source.entry(source.to_string()).or_default();
        for candidate in candidates {
            targets
                .entry(candidate.readable_index)
                .and_modify(|best| *best = best.max(candidate.score))
                .or_insert(candidate.score);
        }
    }

    /// Final per-source lists: sorted by descending score (ties broken by
    /// target identity) and truncated to [`MAX_RELATED`].
    pub fn finalize(self) -> HashMap<String, Vec<Candidate>> {
        self.by_source
            .into_iter()
            .map(|(source, targets)| {
                let mut related: Vec<Candidate> = targets
                    .into_iter()
                    .map(|(readable_index, score)| Candidate {
                        readable_index,
                        score,
                    })
                    .collect();
                related.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.readable_index.cmp(&b.readable_index))
                });
                related.truncate(MAX_RELATED);
                (source, related)
            })
            .collect()
    }
}
