//! HTTP front end.
//!
//! A thin JSON layer over the two pipelines, matching the wire format the
//! UI speaks.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/index` | Clone and index a repository (`{"repoUrl": ...}`) |
//! | `POST` | `/api/search` | Answer a question from indexed snippets (`{"inputValue": ...}`) |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! An empty retrieval is not an error inside the core; this layer translates
//! it into `404 {"error": "No relevant snippets found"}`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::completion::{self, CompletionClient};
use crate::config::Config;
use crate::embedding::{self, EmbeddingClient};
use crate::store::SnippetStore;
use crate::{ingest, search};

/// Shared application state passed to all route handlers.
///
/// The store handle is opened once at startup and lives for the process;
/// the provider clients are constructed once from config.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<SnippetStore>,
    embedder: Arc<dyn EmbeddingClient>,
    completion: Arc<dyn CompletionClient>,
}

/// Start the HTTP server on the configured bind address.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let store = SnippetStore::open(config).await?;
    store.run_migrations().await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(store),
        embedder: Arc::from(embedding::create_client(&config.embedding)?),
        completion: Arc::from(completion::create_client(&config.completion)?),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/index", post(handle_index))
        .route("/api/search", post(handle_search))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("Server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

fn internal_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        message: message.into(),
    }
}

// ============ POST /api/index ============

#[derive(Deserialize)]
struct IndexRequest {
    #[serde(rename = "repoUrl")]
    repo_url: String,
}

#[derive(Serialize)]
struct IndexResponse {
    status: String,
    count: usize,
}

/// Clone the requested repository, index it, and report the snippet count.
/// The temporary checkout is removed on success and failure alike.
async fn handle_index(
    State(state): State<AppState>,
    Json(req): Json<IndexRequest>,
) -> Result<Json<IndexResponse>, AppError> {
    let count = ingest::index_target(&state.store, state.embedder.as_ref(), &req.repo_url)
        .await
        .map_err(|err| {
            error!(error = %err, repo = %req.repo_url, "index request failed");
            internal_error("Something went wrong")
        })?;

    Ok(Json(IndexResponse {
        status: "success".to_string(),
        count,
    }))
}

// ============ POST /api/search ============

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "inputValue")]
    input_value: String,
}

#[derive(Serialize)]
struct SearchResponse {
    value: Vec<String>,
}

async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let result = search::answer(
        &state.store,
        state.embedder.as_ref(),
        state.completion.as_ref(),
        &req.input_value,
        state.config.retrieval.top_n,
    )
    .await
    .map_err(|err| {
        error!(error = %err, "search request failed");
        internal_error("Something went wrong")
    })?;

    match result {
        Some(text) => Ok(Json(SearchResponse { value: vec![text] })),
        None => Err(not_found("No relevant snippets found")),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
