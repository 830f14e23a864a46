use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::gateway::MediaGateway;
use crate::media::{MediaType, SearchResultSet};
use crate::pages::{load_details_page, load_home_feed};
use crate::tmdb::{TmdbApi, TmdbClient};

#[derive(Clone)]
pub struct AppState {
    pub gateway: MediaGateway,
}

impl AppState {
    pub fn new(tmdb: Arc<dyn TmdbApi>) -> Self {
        Self {
            gateway: MediaGateway::new(tmdb),
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    let app = build_router(AppState::new(tmdb));

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search))
        .route("/api/home", get(home))
        .route("/api/genres/:media_type", get(genres))
        .route("/details/:media_type/:id", get(details))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// First `query` value wins when the parameter is repeated; empty or missing skips upstream.
async fn search(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<SearchResultSet> {
    let query = params
        .into_iter()
        .find(|(key, _)| key == "query")
        .map(|(_, value)| value)
        .unwrap_or_default();
    if query.is_empty() {
        debug!("Empty search query, skipping upstream");
        return Json(SearchResultSet::default());
    }
    Json(state.gateway.search_media(&query).await)
}

async fn home(State(state): State<AppState>) -> Response {
    Json(load_home_feed(&state.gateway).await).into_response()
}

async fn genres(State(state): State<AppState>, Path(media_type): Path<String>) -> Response {
    let Ok(media_type) = media_type.parse::<MediaType>() else {
        return not_found();
    };
    Json(state.gateway.fetch_genres(media_type).await).into_response()
}

async fn details(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, String)>,
) -> Response {
    let Ok(parsed) = media_type.parse::<MediaType>() else {
        warn!("Rejecting detail request for unknown media type '{}'", media_type);
        return not_found();
    };
    match load_details_page(&state.gateway, parsed, &id).await {
        Some(page) => Json(page).into_response(),
        None => {
            warn!("No {} found for id {}", parsed, id);
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
