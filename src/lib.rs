//! # Script Librarian
//!
//! Indexes code snippets from a repository into a vector store and answers
//! natural-language questions grounded in them.
//!
//! Script Librarian extracts named units (functions, methods, route
//! registrations, YAML documents) from a file tree, embeds each one through
//! an external provider, and persists them in SQLite. A query embeds the
//! question, ranks every stored snippet by cosine similarity, and hands the
//! top matches to a completion provider as grounding context.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────────┐   ┌──────────┐
//! │ File tree │──▶│   Extractor    │──▶│ Embedding │──▶ SQLite
//! │ (or repo) │   │ js/ts + yaml  │   │ provider │
//! └───────────┘   └───────────────┘   └──────────┘
//!
//! ┌───────┐   ┌──────────┐   ┌────────┐   ┌──────────┐   ┌────────────┐
//! │ Query │──▶│ Embedding │──▶│ Ranker │──▶│ Assembler │──▶│ Completion │
//! └───────┘   └──────────┘   └────────┘   └──────────┘   └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! librarian init                                  # create database
//! librarian index https://github.com/acme/shop    # clone + index a repo
//! librarian search "how are orders created?"      # ranked snippets
//! librarian ask "how are orders created?"         # grounded answer
//! librarian serve                                 # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | File-tree walk and extension dispatch |
//! | [`extract_script`] | Named-unit extraction from js/ts source |
//! | [`extract_yaml`] | Multi-document YAML extraction |
//! | [`tags`] | Tag inference rules |
//! | [`embedding`] | Embedding provider clients |
//! | [`completion`] | Completion provider clients |
//! | [`store`] | SQLite snippet store |
//! | [`rank`] | Cosine-similarity ranking |
//! | [`prompt`] | Grounding-context assembly |
//! | [`fetch`] | Temporary repository checkouts |
//! | [`ingest`] | Index pipeline |
//! | [`search`] | Query pipeline |
//! | [`server`] | HTTP server |

pub mod completion;
pub mod config;
pub mod embedding;
pub mod extract;
pub mod extract_script;
pub mod extract_yaml;
pub mod fetch;
pub mod ingest;
pub mod models;
pub mod prompt;
pub mod rank;
pub mod search;
pub mod server;
pub mod store;
pub mod tags;
