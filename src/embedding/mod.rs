//! Embedding providers: map batches of text to fixed-dimension vectors.
//!
//! Two backends exist, selected once at startup: an in-process fastembed
//! model (`local`) and a remote Text Embeddings Inference endpoint (`tei`).

pub mod local;
pub mod tei;

use crate::config::ProviderConfig;

/// Errors from embedding providers.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Invalid model name: {0}")]
    InvalidModel(String),

    #[error("Embedding request failed: {0}")]
    Transport(String),

    #[error("Provider returned {got} embeddings for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
}

/// A source of embeddings.
///
/// Implementations batch internally. The output has the same length and
/// order as the input, or the call fails; silent truncation is a contract
/// violation.
pub trait EmbeddingProvider {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Build the configured provider once at startup.
pub fn create_provider(
    config: &ProviderConfig,
    batch_size: usize,
) -> Result<Box<dyn EmbeddingProvider>, EmbeddingError> {
    match config {
        ProviderConfig::Tei { endpoint } => Ok(Box::new(tei::TeiProvider::new(
            endpoint.clone(),
            batch_size,
        )?)),
        ProviderConfig::Local { model, cache_dir } => Ok(Box::new(local::LocalProvider::new(
            model,
            cache_dir.clone(),
            batch_size,
        )?)),
    }
}
