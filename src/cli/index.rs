//! Index command implementation

use crate::cli::IndexBuildArgs;
use crate::retrieval::{HttpEmbedder, VectorIndex};
use std::sync::Arc;

/// Handle `triage index build` command
///
/// Chunks every `.md`/`.txt` file under the data directory, embeds the chunks
/// and writes the index as JSON.
pub async fn handle_index_build(
    args: &IndexBuildArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let config = super::load_config(&args.config)?;
    config.validate()?;

    let retrieval = &config.retrieval;
    let data_dir = args.data_dir.as_ref().unwrap_or(&retrieval.data_dir);
    let output = args.output.as_ref().unwrap_or(&retrieval.index_path);

    let embedder = HttpEmbedder::from_config(&retrieval.embedding, Arc::new(reqwest::Client::new()));
    let index = VectorIndex::build_from_dir(
        data_dir,
        &embedder,
        retrieval.chunk_size,
        retrieval.chunk_overlap,
    )
    .await?;
    index.save(output)?;

    Ok(format!(
        "✓ Indexed {} chunks ({} dimensions, model {}) from {} into {}",
        index.len(),
        index.dimensions(),
        index.model(),
        data_dir.display(),
        output.display()
    ))
}
