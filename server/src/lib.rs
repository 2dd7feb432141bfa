use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use docsearch_core::{
    BuildReport, DocId, DocumentRecord, IndexBuilder, IndexHandle, QueryProcessor,
    StandardTokenizer,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Corpus the index is built from, at startup and on rebuild.
    pub corpus: PathBuf,
    /// Directory served for paths no route matches.
    pub www_root: Option<PathBuf>,
    pub stem: bool,
    pub stop_words: Option<PathBuf>,
    /// Token required by the admin endpoints; they are disabled when unset.
    pub admin_token: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(alias = "word")]
    pub q: Option<String>,
    /// Keep at most this many results.
    pub k: Option<usize>,
}

#[derive(Clone)]
pub struct AppState {
    pub index: IndexHandle,
    pub tokenizer: Arc<StandardTokenizer>,
    pub corpus: PathBuf,
    pub admin_token: Option<String>,
}

/// Build the index from `config.corpus` and return the router serving it.
///
/// The index is complete before this returns, so no request ever sees a
/// partially built store.
pub fn build_app(config: ServerConfig) -> Result<Router> {
    let mut tokenizer = StandardTokenizer::new().with_stemming(config.stem);
    if let Some(path) = &config.stop_words {
        tokenizer = tokenizer.with_stop_words_file(path)?;
    }
    let built = IndexBuilder::new(&tokenizer).build(&config.corpus)?;
    tracing::info!(documents = built.report.indexed, skipped = built.report.skipped, "index ready");

    let app_state = AppState {
        index: IndexHandle::new(built.store),
        tokenizer: Arc::new(tokenizer),
        corpus: config.corpus,
        admin_token: config.admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let mut app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/s", get(search_handler))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/index/rebuild", post(rebuild_handler))
        .with_state(app_state);
    if let Some(root) = config.www_root {
        app = app.fallback_service(ServeDir::new(root));
    }
    Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let Some(query) = params.q else {
        return (StatusCode::BAD_REQUEST, "missing search keyword: use ?word= or ?q=").into_response();
    };
    tracing::info!(%query, "search");
    let store = state.index.snapshot();
    let mut results = QueryProcessor::new(&*store, &*state.tokenizer).search(&query);
    if let Some(k) = params.k {
        results.truncate(k.max(1));
    }
    Json(results).into_response()
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<DocumentRecord>, (StatusCode, String)> {
    let store = state.index.snapshot();
    store
        .document(doc_id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("no document {doc_id}")))
}

/// Rebuild from the configured corpus and swap the new index in whole.
async fn rebuild_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BuildReport>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let tokenizer = state.tokenizer.clone();
    let corpus = state.corpus.clone();
    let built = tokio::task::spawn_blocking(move || IndexBuilder::new(&*tokenizer).build(&corpus))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            tracing::error!(error = %e, "rebuild failed, keeping current index");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    state.index.replace(built.store);
    tracing::info!(documents = built.report.indexed, "index replaced");
    Ok(Json(built.report))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
