//! Context assembly for the completion call.
//!
//! Renders the fixed template resource with the user query and the ranked
//! snippets. Rendering is deterministic and never drops a snippet: the count
//! of rendered blocks equals the count of input snippets.

use crate::models::RankedSnippet;

const TEMPLATE: &str = include_str!("../templates/archivist.md");

/// Render the grounding prompt handed to the completion provider.
///
/// Each snippet gets a 1-based display index and is rendered with its file,
/// name, and code body, in ranked order.
pub fn assemble(query: &str, snippets: &[RankedSnippet]) -> String {
    let mut blocks = String::new();
    for (idx, ranked) in snippets.iter().enumerate() {
        let snippet = &ranked.snippet;
        blocks.push_str(&format!(
            "### Snippet {num}\nFile: `{file}`\nName: `{name}`\n\n```\n{code}\n```\n\n",
            num = idx + 1,
            file = snippet.file,
            name = snippet.name.as_deref().unwrap_or(""),
            code = snippet.code,
        ));
    }

    TEMPLATE
        .replace("{{user_query}}", query)
        .replace("{{snippets}}", blocks.trim_end())
}
