//! Runtime configuration for one similarity run.

use std::path::PathBuf;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Default number of texts per embedding batch.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Where local models are cached unless overridden: `~/.cache/relex`,
/// falling back to a directory under the cwd when no home is resolvable.
pub fn default_cache_dir() -> PathBuf {
    homedir::my_home()
        .ok()
        .flatten()
        .map(|home| home.join(".cache").join("relex"))
        .unwrap_or_else(|| PathBuf::from(".relex_cache"))
}

/// Which embedding backend to use, decided once at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ProviderConfig {
    /// In-process fastembed model.
    Local { model: String, cache_dir: PathBuf },
    /// Remote Text Embeddings Inference endpoint.
    Tei { endpoint: String },
}

/// Knobs for the ranking pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Auxiliary fields to embed, processed in order.
    pub auxiliaries: Vec<String>,
    /// Minimum cosine similarity for a candidate to be kept.
    pub threshold: Option<f32>,
    /// Texts per embedding batch.
    pub batch_size: usize,
}

impl PipelineConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auxiliaries.is_empty() {
            bail!("at least one auxiliary field is required");
        }
        if self.batch_size == 0 {
            bail!("batch size must be greater than 0");
        }
        if let Some(threshold) = self.threshold {
            if !(-1.0..=1.0).contains(&threshold) {
                bail!("threshold must be between -1.0 and 1.0, got {threshold}");
            }
        }
        Ok(())
    }
}
