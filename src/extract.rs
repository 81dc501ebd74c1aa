//! Snippet extraction over a file tree.
//!
//! Walks the tree in deterministic order, dispatches each file by extension
//! to a source-aware strategy, and collects a flat sequence of snippets.
//! Extraction is best-effort and file-scoped: a file that fails to read or
//! parse is logged and skipped, never aborting the walk.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::extract_script::{self, ScriptLang};
use crate::extract_yaml;
use crate::models::Snippet;

const SKIP_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// Extract all snippets beneath `root`, in deterministic traversal order.
pub fn scan_tree(root: &Path) -> Result<Vec<Snippet>> {
    anyhow::ensure!(
        root.is_dir(),
        "index root is not a directory: {}",
        root.display()
    );

    let mut snippets = Vec::new();

    let walker = WalkDir::new(root).sort_by_file_name().into_iter();
    for entry in walker.filter_entry(|e| !skip_dir(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        match scan_file(path, &rel_str) {
            Ok(mut found) => snippets.append(&mut found),
            Err(err) => warn!(file = %rel_str, error = %err, "skipping file"),
        }
    }

    debug!(count = snippets.len(), "extraction finished");
    Ok(snippets)
}

fn skip_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIP_DIRS.contains(&name))
            .unwrap_or(false)
}

fn scan_file(path: &Path, relative: &str) -> Result<Vec<Snippet>> {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return Ok(Vec::new());
    };
    let ext = ext.to_ascii_lowercase();

    if let Some(lang) = ScriptLang::from_extension(&ext) {
        let source = std::fs::read_to_string(path)?;
        return extract_script::scan_source(relative, &source, lang);
    }

    if matches!(ext.as_str(), "yaml" | "yml") {
        let content = std::fs::read_to_string(path)?;
        return extract_yaml::scan_documents(relative, &content);
    }

    Ok(Vec::new())
}
