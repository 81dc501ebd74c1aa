//! Index pipeline orchestration.
//!
//! Coordinates the full flow: file tree → extraction (tags attached
//! inline) → one batch embedding call → one atomic bulk write. Embedding
//! and store failures abort the whole run with nothing persisted.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;
use crate::embedding::{self, EmbeddingClient, TaskHint};
use crate::extract;
use crate::fetch;
use crate::store::SnippetStore;

/// Run the index pipeline over a local file tree.
///
/// Returns the number of snippets persisted. All snippet texts go to the
/// embedding provider in a single call, and the returned vectors attach
/// positionally.
pub async fn run_index(
    store: &SnippetStore,
    embedder: &dyn EmbeddingClient,
    root: &Path,
) -> Result<usize> {
    let mut snippets = extract::scan_tree(root)?;
    debug!(count = snippets.len(), "extracted snippets");

    if snippets.is_empty() {
        return Ok(0);
    }

    let texts: Vec<String> = snippets.iter().map(|s| s.code.clone()).collect();
    let vectors = embedder
        .embed(&texts, TaskHint::Document)
        .await
        .context("failed to generate embeddings")?;

    if vectors.len() != snippets.len() {
        bail!(
            "embedding count mismatch: {} texts, {} vectors",
            snippets.len(),
            vectors.len()
        );
    }

    for (snippet, vector) in snippets.iter_mut().zip(vectors) {
        snippet.embedding = Some(vector);
    }

    store
        .bulk_write(&snippets)
        .await
        .context("failed to store snippets")?;
    info!(count = snippets.len(), root = %root.display(), "indexed snippets");

    Ok(snippets.len())
}

/// Index a local directory or a remote repository URL.
///
/// Remote targets are shallow-cloned into a temporary checkout that is
/// removed when this function returns, whether it succeeds or fails.
pub async fn index_target(
    store: &SnippetStore,
    embedder: &dyn EmbeddingClient,
    target: &str,
) -> Result<usize> {
    if fetch::is_remote(target) {
        let checkout = fetch::clone_repo(target)?;
        run_index(store, embedder, checkout.path()).await
    } else {
        run_index(store, embedder, Path::new(target)).await
    }
}

/// CLI entry point for `librarian index`.
pub async fn run_index_cmd(config: &Config, target: &str) -> Result<()> {
    let store = SnippetStore::open(config).await?;
    let embedder = embedding::create_client(&config.embedding)?;

    let count = index_target(&store, embedder.as_ref(), target).await?;

    println!("index {}", target);
    println!("  snippets stored: {}", count);
    println!("ok");

    store.close().await;
    Ok(())
}
