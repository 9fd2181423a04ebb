//! Read-only views of the node store.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/nodes", get(get_counts))
        .route("/nodes/{model}", get(list_nodes))
}

/// GET /api/nodes — node count per model.
async fn get_counts(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let counts = state.node_store.counts();
    Json(serde_json::json!({
        "total": state.node_store.len(),
        "models": counts,
    }))
}

/// GET /api/nodes/{model}
async fn list_nodes(
    State(state): State<Arc<AppState>>,
    Path(model): Path<String>,
) -> Json<serde_json::Value> {
    if !state.models.iter().any(|m| m.name == model) {
        return Json(serde_json::json!({ "error": format!("Unknown model: {}", model) }));
    }
    let nodes = state.node_store.list(&model);
    Json(serde_json::json!({
        "model": model,
        "nodes": nodes,
    }))
}
