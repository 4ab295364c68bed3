//! Similarity core: vector normalization, per-field neighbor ranking, and
//! cross-field merging of candidate lists.
//!
//! All functions operate on plain `Vec<f32>` rows; the full pairwise
//! comparison is O(N²) per field and assumes one field's embeddings fit in
//! memory.

mod merge;
mod normalize;
mod rank;

pub use merge::RelatedAccumulator;
pub use normalize::normalize_rows;
pub use rank::rank_sources;

/// Maximum number of related excerpts kept per source.
pub const MAX_RELATED: usize = 5;

/// One neighbor candidate for a source excerpt.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub readable_index: String,
    /// Cosine similarity, in [-1, 1].
    pub score: f32,
}

/// Errors from the similarity core.
#[derive(Debug, thiserror::Error)]
pub enum SimilarityError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Embedding at position {index} has zero norm")]
    ZeroNormVector { index: usize },

    #[error("Got {rows} embeddings for {ids} identities")]
    LengthMismatch { rows: usize, ids: usize },
}
