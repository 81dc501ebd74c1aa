//! Query pipeline: query text → embedding → full scan → ranking → context
//! assembly → completion.

use anyhow::Result;

use crate::completion::{self, CompletionClient};
use crate::config::Config;
use crate::embedding::{self, EmbeddingClient};
use crate::models::RankedSnippet;
use crate::prompt;
use crate::rank;
use crate::store::SnippetStore;

/// Retrieve the snippets most relevant to a query.
///
/// Issues exactly one embedding call carrying the query text, scans every
/// embedded snippet in the store, and ranks by cosine similarity. An empty
/// result is the defined "nothing found" condition, not an error.
pub async fn retrieve(
    store: &SnippetStore,
    embedder: &dyn EmbeddingClient,
    query: &str,
    top_n: usize,
) -> Result<Vec<RankedSnippet>> {
    let query_vec = embedding::embed_query(embedder, query).await?;
    let candidates = store.scan_embedded().await?;
    Ok(rank::rank(&query_vec, candidates, top_n))
}

/// Full query pipeline: retrieve, assemble the grounding prompt, and ask
/// the completion provider. Returns `None` when no snippets were found;
/// the caller translates that into a "nothing found" response instead of
/// attempting context assembly.
pub async fn answer(
    store: &SnippetStore,
    embedder: &dyn EmbeddingClient,
    completion: &dyn CompletionClient,
    query: &str,
    top_n: usize,
) -> Result<Option<String>> {
    let ranked = retrieve(store, embedder, query, top_n).await?;
    if ranked.is_empty() {
        return Ok(None);
    }

    let rendered = prompt::assemble(query, &ranked);
    let text = completion.generate(&rendered).await?;
    Ok(Some(text))
}

/// CLI entry point for `librarian search`.
pub async fn run_search(config: &Config, query: &str, limit: Option<usize>) -> Result<()> {
    let store = SnippetStore::open(config).await?;
    let embedder = embedding::create_client(&config.embedding)?;
    let top_n = limit.unwrap_or(config.retrieval.top_n);

    let ranked = retrieve(&store, embedder.as_ref(), query, top_n).await?;

    if ranked.is_empty() {
        println!("No relevant snippets found.");
        store.close().await;
        return Ok(());
    }

    for (i, result) in ranked.iter().enumerate() {
        let snippet = &result.snippet;
        println!(
            "{}. [{:.3}] {} / {} ({})",
            i + 1,
            result.similarity,
            snippet.file,
            snippet.name.as_deref().unwrap_or("(unnamed)"),
            snippet.kind
        );
        if !snippet.tags.is_empty() {
            println!("    tags: {}", snippet.tags.join(", "));
        }
        let preview: String = snippet.code.replace('\n', " ").trim().chars().take(96).collect();
        println!("    code: \"{}\"", preview);
        println!();
    }

    store.close().await;
    Ok(())
}

/// CLI entry point for `librarian ask`.
pub async fn run_ask(config: &Config, query: &str) -> Result<()> {
    let store = SnippetStore::open(config).await?;
    let embedder = embedding::create_client(&config.embedding)?;
    let completion = completion::create_client(&config.completion)?;

    match answer(
        &store,
        embedder.as_ref(),
        completion.as_ref(),
        query,
        config.retrieval.top_n,
    )
    .await?
    {
        Some(text) => println!("{}", text),
        None => println!("No relevant snippets found."),
    }

    store.close().await;
    Ok(())
}
