//! # Script Librarian CLI (`librarian`)
//!
//! The `librarian` binary is the primary interface. It provides commands for
//! database initialization, repository indexing, snippet search, grounded
//! question answering, and starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! librarian --config ./config/librarian.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `librarian init` | Create the SQLite database and schema |
//! | `librarian index <target>` | Index a local directory or remote repository |
//! | `librarian search "<query>"` | Print the top-ranked snippets for a query |
//! | `librarian ask "<query>"` | Generate an answer grounded in the top snippets |
//! | `librarian serve` | Start the HTTP server |

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use script_librarian::{config, ingest, search, server, store::SnippetStore};

/// Script Librarian — index code snippets from a repository and answer
/// questions grounded in them.
#[derive(Parser)]
#[command(
    name = "librarian",
    about = "Script Librarian — index code snippets and answer questions grounded in them",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/librarian.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the snippet table. Idempotent;
    /// running it multiple times is safe.
    Init,

    /// Index a local directory or a remote repository URL.
    ///
    /// Remote targets are shallow-cloned into a temporary checkout that is
    /// removed afterwards. Extracted snippets are embedded in one provider
    /// call and stored in one atomic write; every run appends to the
    /// existing corpus.
    Index {
        /// A local path or a repository URL (`https://...`, `git@...`).
        target: String,
    },

    /// Search indexed snippets and print the top matches with scores.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Answer a question using the top-ranked snippets as grounding context.
    Ask {
        /// The question to answer.
        query: String,
    },

    /// Start the HTTP server.
    ///
    /// Binds to the address configured in `[server].bind` and exposes
    /// `POST /api/index` and `POST /api/search`.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let store = SnippetStore::open(&cfg).await?;
            store.run_migrations().await?;
            store.close().await;
            println!("Database initialized successfully.");
        }
        Commands::Index { target } => {
            ingest::run_index_cmd(&cfg, &target).await?;
        }
        Commands::Search { query, limit } => {
            search::run_search(&cfg, &query, limit).await?;
        }
        Commands::Ask { query } => {
            search::run_ask(&cfg, &query).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
