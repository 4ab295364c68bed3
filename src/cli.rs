use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_BATCH_SIZE;

/// Compute per-excerpt related lists from auxiliary-field embeddings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// JSONL file with excerpts
    #[clap(short, long)]
    pub input_file: PathBuf,

    /// Name of the local sentence embedding model (e.g. "bge-small-en-v1.5")
    #[clap(short = 'm', long)]
    pub embedding_model: Option<String>,

    /// Hugging Face TEI endpoint. If provided, no local model is loaded.
    #[clap(long)]
    pub tei_endpoint: Option<String>,

    /// Number of embeddings to generate in one batch
    #[clap(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// One or more auxiliary keys to use for embedding
    #[clap(short, long, required = true, num_args = 1..)]
    pub auxiliaries: Vec<String>,

    /// Minimum cosine similarity threshold. The top 5 are picked either way.
    #[clap(short, long, allow_hyphen_values = true)]
    pub threshold: Option<f32>,

    /// Directory for cached local models; defaults to ~/.cache/relex
    #[clap(long)]
    pub model_cache_dir: Option<PathBuf>,

    /// JSONL file to store the output; defaults to <input>.emb.jsonl
    #[clap(short, long)]
    pub output_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let args = Args::parse_from([
            "relex",
            "--input-file",
            "excerpts.jsonl",
            "--auxiliaries",
            "comm",
            "--embedding-model",
            "bge-small-en-v1.5",
        ]);

        assert_eq!(args.input_file, PathBuf::from("excerpts.jsonl"));
        assert_eq!(args.auxiliaries, vec!["comm"]);
        assert_eq!(args.batch_size, DEFAULT_BATCH_SIZE);
        assert!(args.threshold.is_none());
        assert!(args.tei_endpoint.is_none());
        assert!(args.model_cache_dir.is_none());
    }

    #[test]
    fn test_multiple_auxiliaries_and_negative_threshold() {
        let args = Args::parse_from([
            "relex",
            "-i",
            "excerpts.jsonl",
            "-a",
            "comm",
            "trans",
            "-t",
            "-0.25",
            "--tei-endpoint",
            "http://localhost:8080/embed",
        ]);

        assert_eq!(args.auxiliaries, vec!["comm", "trans"]);
        assert_eq!(args.threshold, Some(-0.25));
    }

    #[test]
    fn test_auxiliaries_required() {
        let result = Args::try_parse_from(["relex", "-i", "excerpts.jsonl"]);
        assert!(result.is_err());
    }
}
