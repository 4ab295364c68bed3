//! Per-auxiliary-field orchestration: gather, embed, normalize, rank, merge.

use anyhow::Context;

use crate::config::PipelineConfig;
use crate::embedding::EmbeddingProvider;
use crate::records::{Excerpt, RelatedEntry, RelatedRecord};
use crate::similarity::{normalize_rows, rank_sources, RelatedAccumulator};

/// Run the full similarity pipeline over `excerpts`.
///
/// Fields are processed sequentially; related lists accumulate across
/// fields with the higher score winning per (source, target) pair. The
/// output holds one record per excerpt that was embedded for at least one
/// field, in input order.
pub fn run(
    excerpts: &[Excerpt],
    provider: &dyn EmbeddingProvider,
    config: &PipelineConfig,
) -> anyhow::Result<Vec<RelatedRecord>> {
    let mut accumulator = RelatedAccumulator::new();

    for field in &config.auxiliaries {
        log::info!("processing auxiliary '{field}'");

        let mut ids = Vec::new();
        let mut texts = Vec::new();
        for excerpt in excerpts {
            if let Some(text) = excerpt.auxiliary_text(field) {
                ids.push(excerpt.readable_index.clone());
                texts.push(text);
            }
        }

        if texts.is_empty() {
            log::info!("no texts found for auxiliary '{field}', skipping");
            continue;
        }

        log::info!(
            "embedding {} texts for auxiliary '{field}' via {} provider",
            texts.len(),
            provider.name()
        );

        let embeddings = provider
            .embed(&texts)
            .with_context(|| format!("embedding failed for auxiliary '{field}'"))?;
        let normalized = normalize_rows(embeddings)
            .with_context(|| format!("normalization failed for auxiliary '{field}'"))?;

        let ranked = rank_sources(&normalized, &ids, config.threshold)?;
        for (source, candidates) in ids.iter().zip(ranked) {
            accumulator.add(source, candidates);
        }
    }

    let mut related = accumulator.finalize();
    let records = excerpts
        .iter()
        .filter_map(|excerpt| {
            related
                .remove(&excerpt.readable_index)
                .map(|candidates| RelatedRecord {
                    readable_index: excerpt.readable_index.clone(),
                    related: candidates
                        .into_iter()
                        .map(|c| RelatedEntry {
                            readable_index: c.readable_index,
                            score: c.score,
                        })
                        .collect(),
                })
        })
        .collect();

    Ok(records)
}
