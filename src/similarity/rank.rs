//! Per-field neighbor ranking over a normalized embedding matrix.

use std::cmp::Ordering;

use crate::similarity::{Candidate, SimilarityError, MAX_RELATED};

/// Indices preselected per source before self/threshold filtering. The one
/// extra slot over [`MAX_RELATED`] absorbs the self match; if a threshold
/// or ties knock out more than one of the preselected six, fewer than five
/// candidates come back for that source even when qualifying targets exist
/// further down the ranking.
const PRESELECT: usize = MAX_RELATED + 1;

/// For each source row, return up to [`MAX_RELATED`] neighbors sorted by
/// descending cosine similarity, excluding the source itself.
///
/// `rows` must already be unit-normalized so the dot product is the exact
/// cosine similarity. Candidates scoring strictly below `threshold` are
/// dropped. `ids` runs parallel to `rows`.
pub fn rank_sources(
    rows: &[Vec<f32>],
    ids: &[String],
    threshold: Option<f32>,
) -> Result<Vec<Vec<Candidate>>, SimilarityError> {
    if rows.len() != ids.len() {
        return Err(SimilarityError::LengthMismatch {
            rows: rows.len(),
            ids: ids.len(),
        });
    }

    let mut ranked = Vec::with_capacity(rows.len());
    for (i, source) in rows.iter().enumerate() {
        let scores: Vec<f32> = rows.iter().map(|row| dot(row, source)).collect();
        ranked.push(top_candidates(i, &scores, ids, threshold));
    }

    Ok(ranked)
}

fn top_candidates(
    source: usize,
    scores: &[f32],
    ids: &[String],
    threshold: Option<f32>,
) -> Vec<Candidate> {
    let mut order: Vec<usize> = (0..scores.len()).collect();

    // Partial selection; a full sort of the corpus is not needed.
    if order.len() > PRESELECT {
        order.select_nth_unstable_by(PRESELECT - 1, |&a, &b| by_score_desc(scores, a, b));
        order.truncate(PRESELECT);
    }
    order.sort_unstable_by(|&a, &b| by_score_desc(scores, a, b));

    let mut candidates = Vec::new();
    for j in order {
        if j == source {
            continue;
        }
        if let Some(min) = threshold {
            if scores[j] < min {
                continue;
            }
        }

        candidates.push(Candidate {
            readable_index: ids[j].clone(),
            score: scores[j],
        });

        if candidates.len() >= MAX_RELATED {
            break;
        }
    }

    candidates
}

/// Descending by score, ties broken by original index for determinism.
fn by_score_desc(scores: &[f32], a: usize, b: usize) -> Ordering {
    scores[b]
        .partial_cmp(&scores[a])
        .unwrap_or(Ordering::Equal)
        .then(a.cmp(&b))
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
