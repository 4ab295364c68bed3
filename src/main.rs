use anyhow::bail;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod embedding;
mod pipeline;
mod records;
mod similarity;
#[cfg(test)]
mod tests;

use config::{PipelineConfig, ProviderConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();

    let provider_config = match (&args.tei_endpoint, &args.embedding_model) {
        (Some(endpoint), _) => ProviderConfig::Tei {
            endpoint: endpoint.clone(),
        },
        (None, Some(model)) => ProviderConfig::Local {
            model: model.clone(),
            cache_dir: args
                .model_cache_dir
                .clone()
                .unwrap_or_else(config::default_cache_dir),
        },
        (None, None) => bail!("either --embedding-model or --tei-endpoint is required"),
    };

    let config = PipelineConfig {
        auxiliaries: args.auxiliaries.clone(),
        threshold: args.threshold,
        batch_size: args.batch_size,
    };
    config.validate()?;

    let excerpts = records::read_excerpts(&args.input_file)?;
    log::info!("loaded {} excerpts", excerpts.len());

    let provider = embedding::create_provider(&provider_config, config.batch_size)?;
    let output_records = pipeline::run(&excerpts, provider.as_ref(), &config)?;

    let output_file = args
        .output_file
        .unwrap_or_else(|| records::default_output_path(&args.input_file));
    records::write_related(&output_file, &output_records)?;
    log::info!(
        "wrote {} records to {}",
        output_records.len(),
        output_file.display()
    );

    Ok(())
}
