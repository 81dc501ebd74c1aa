//! Structured-document extraction from YAML files.
//!
//! A single file may hold several documents separated by `---` markers; each
//! becomes one snippet. Unlike script extraction, the snippet body is a
//! canonical re-dump of the parsed value, not the original text.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

use crate::models::{Snippet, SnippetKind};

/// Extract one snippet per document in a YAML file.
///
/// Null documents are dropped. Names carry a `#<k>` suffix (1-based) only
/// when the file holds more than one document. Tags come from a list-shaped
/// `tags` key when present.
///
/// # Errors
///
/// Any malformed document fails the whole file; the caller skips it and
/// continues the walk.
pub fn scan_documents(file: &str, content: &str) -> Result<Vec<Snippet>> {
    let mut docs = Vec::new();
    for de in serde_yaml::Deserializer::from_str(content) {
        let value =
            Value::deserialize(de).with_context(|| format!("invalid YAML document in {file}"))?;
        if value.is_null() {
            continue;
        }
        docs.push(value);
    }

    let multi = docs.len() > 1;
    let base = Path::new(file)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());

    Ok(docs
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let name = if multi {
                format!("{base}#{}", idx + 1)
            } else {
                base.clone()
            };

            let mut snippet = Snippet::new(file, Some(name), SnippetKind::YamlDocument);
            snippet.code = serde_yaml::to_string(value).unwrap_or_default();
            snippet.tags = document_tags(value);
            snippet
        })
        .collect())
}

fn document_tags(value: &Value) -> Vec<String> {
    match value.get("tags") {
        Some(Value::Sequence(items)) => items.iter().map(tag_string).collect(),
        _ => Vec::new(),
    }
}

fn tag_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_document_keeps_plain_name() {
        let found = scan_documents("deploy/app.yaml", "name: web\nreplicas: 2\n").unwrap();
        assert_eq!(found.len(), 1);
        let s = &found[0];
        assert_eq!(s.kind, SnippetKind::YamlDocument);
        assert_eq!(s.name.as_deref(), Some("app.yaml"));
        assert!(s.tags.is_empty());
    }

    #[test]
    fn multiple_documents_get_ordinal_suffixes() {
        let content = "name: a\n---\nname: b\n---\nname: c\n";
        let found = scan_documents("stack.yml", content).unwrap();
        assert_eq!(found.len(), 3);
        let names: Vec<&str> = found.iter().filter_map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec!["stack.yml#1", "stack.yml#2", "stack.yml#3"]);
    }

    #[test]
    fn null_documents_are_dropped() {
        // Two documents, one null: the survivor keeps a plain name.
        let content = "name: only\n---\n~\n";
        let found = scan_documents("one.yaml", content).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.as_deref(), Some("one.yaml"));
    }

    #[test]
    fn code_is_a_canonical_redump() {
        let content = "b:   2\na: 1   # trailing comment\n";
        let found = scan_documents("cfg.yaml", content).unwrap();
        assert_eq!(found[0].code, "b: 2\na: 1\n");
    }

    #[test]
    fn list_shaped_tags_are_taken_directly() {
        let content = "tags:\n  - api\n  - api\n  - 7\nname: svc\n";
        let found = scan_documents("svc.yaml", content).unwrap();
        assert_eq!(found[0].tags, vec!["api", "api", "7"]);
    }

    #[test]
    fn non_list_tags_are_ignored() {
        let found = scan_documents("svc.yaml", "tags: api\n").unwrap();
        assert!(found[0].tags.is_empty());
    }

    #[test]
    fn malformed_yaml_fails_the_file() {
        assert!(scan_documents("bad.yaml", "a: [unclosed\n").is_err());
    }
}
