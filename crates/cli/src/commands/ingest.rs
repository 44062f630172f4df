//! `tika ingest` — Build the knowledge index from documents.

use std::path::PathBuf;
use tika_config::AppConfig;
use tika_memory::Ingestor;

pub async fn run(
    path: PathBuf,
    output: Option<PathBuf>,
    no_embed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let output = output.unwrap_or_else(|| config.index_path());

    let mut ingestor = Ingestor::from_config(&config.knowledge);
    let embedding_provider = config.knowledge.embedding_provider.as_str();

    if !no_embed && embedding_provider != "none" {
        let router = tika_providers::build_from_config(&config);
        let provider = router
            .get(embedding_provider)
            .ok_or_else(|| format!("Embedding provider '{embedding_provider}' is not configured"))?;
        ingestor = ingestor.with_embeddings(provider, config.knowledge.embedding_model.clone());
        println!(
            "  Embedding with {} ({})",
            embedding_provider, config.knowledge.embedding_model
        );
    } else {
        println!("  Storing chunks without embeddings (keyword retrieval)");
    }

    println!("  Reading documents from {}", path.display());
    let index = ingestor.ingest_path(&path).await?;
    index.save(&output)?;

    println!();
    println!("  ✅ Indexed {} chunks from {} documents", index.len(), index.document_count());
    println!("     Saved to {}", output.display());
    if output != config.index_path() {
        println!("     Set knowledge.index_path in config.toml to use this index in chat.");
    }
    println!();

    Ok(())
}
