//! Axum router configuration with middleware.
//!
//! Procedure calls live under `/api/rpc/`; `/health` needs no credentials.
//! Middleware: CORS, request tracing. RPC bodies are capped at
//! `AppState::max_body_bytes`, which must fit a generated image data URL.

use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use pocketchat_types::rpc::RPC_PREFIX;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let rpc_routes = Router::new()
        .route(
            "/{procedure}",
            get(handlers::rpc::query_procedure).post(handlers::rpc::mutate_procedure),
        )
        .layer(DefaultBodyLimit::max(state.max_body_bytes));

    Router::new()
        .nest(RPC_PREFIX, rpc_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "persistence": state.backend(),
        "provider": state.provider_name(),
    }))
}
