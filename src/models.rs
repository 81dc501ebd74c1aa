//! Core data models used throughout Script Librarian.
//!
//! These types represent the code snippets that flow through the indexing
//! and retrieval pipeline.

/// The syntactic shape of an extracted snippet.
///
/// Drives downstream rendering only; ranking is independent of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    FunctionDeclaration,
    ArrowFunction,
    FunctionExpression,
    ClassMethod,
    ObjectMethod,
    ApiRoute,
    YamlDocument,
}

impl SnippetKind {
    /// Identifier stored in the `type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FunctionDeclaration => "function_declaration",
            Self::ArrowFunction => "arrow_function",
            Self::FunctionExpression => "function_expression",
            Self::ClassMethod => "class_method",
            Self::ObjectMethod => "object_method",
            Self::ApiRoute => "api_route",
            Self::YamlDocument => "yaml_document",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "function_declaration" => Some(Self::FunctionDeclaration),
            "arrow_function" => Some(Self::ArrowFunction),
            "function_expression" => Some(Self::FunctionExpression),
            "class_method" => Some(Self::ClassMethod),
            "object_method" => Some(Self::ObjectMethod),
            "api_route" => Some(Self::ApiRoute),
            "yaml_document" => Some(Self::YamlDocument),
            _ => None,
        }
    }
}

impl std::fmt::Display for SnippetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted unit of code or one structured document.
///
/// Produced by the extractor, enriched with tags at extraction time and with
/// an embedding by the index pipeline, then persisted in a single bulk write.
#[derive(Debug, Clone)]
pub struct Snippet {
    /// Path of origin, relative to the indexed tree root.
    pub file: String,
    /// Unit name. `None` for route registrations and anonymous units.
    pub name: Option<String>,
    pub kind: SnippetKind,
    /// Comma-joined parameter names; empty when not applicable.
    pub params: String,
    /// Uppercased HTTP verb (`api_route` only).
    pub verb: Option<String>,
    /// Literal route path from the registration's first argument (`api_route` only).
    pub path: Option<String>,
    /// Exact source span of the unit, or a canonical re-dump for documents.
    pub code: String,
    /// Categorical labels. A multiset: duplicates and empty strings are kept.
    pub tags: Vec<String>,
    /// Embedding vector; absent until the index pipeline embeds the snippet.
    pub embedding: Option<Vec<f32>>,
}

impl Snippet {
    pub fn new(file: impl Into<String>, name: Option<String>, kind: SnippetKind) -> Self {
        Self {
            file: file.into(),
            name,
            kind,
            params: String::new(),
            verb: None,
            path: None,
            code: String::new(),
            tags: Vec::new(),
            embedding: None,
        }
    }
}

/// A snippet read back from the store during retrieval.
#[derive(Debug, Clone)]
pub struct StoredSnippet {
    pub id: i64,
    pub file: String,
    pub name: Option<String>,
    pub kind: SnippetKind,
    pub code: String,
    pub tags: Vec<String>,
    pub embedding: Vec<f32>,
}

/// A retrieval result: a stored snippet with its transient similarity score.
#[derive(Debug, Clone)]
pub struct RankedSnippet {
    pub snippet: StoredSnippet,
    pub similarity: f64,
}
