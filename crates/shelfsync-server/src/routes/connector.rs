//! Connector routes — schema, events, lifecycle.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::state::AppState;
use shelfsync_connectors::events;
use shelfsync_connectors::schema::{options_schema, ModelDefinition, OptionField};
use shelfsync_connectors::{EnableEvent, EventStatus};
use shelfsync_core::ConnectorOptions;

// ---------------------------------------------------------------
// Route builder
// ---------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        // Declarations
        .route("/options", get(get_options))
        .route("/models", get(get_models))
        // Events
        .route("/events/createAllNodes", post(create_all_nodes))
        .route("/events/updateNodes", post(update_nodes))
        // Lifecycle
        .route("/enable", post(enable))
}

/// Body of a createAllNodes invocation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateAllNodesRequest {
    #[serde(default)]
    pub options: Option<ConnectorOptions>,
}

impl CreateAllNodesRequest {
    /// Parse a request body. The host may post nothing at all, or JSON without
    /// a content type, so an empty body is a request with no options.
    pub fn from_body(body: &[u8]) -> serde_json::Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

async fn get_options() -> Json<Vec<OptionField>> {
    Json(options_schema())
}

async fn get_models(State(state): State<Arc<AppState>>) -> Json<Vec<ModelDefinition>> {
    Json(state.models.clone())
}

/// POST /api/events/createAllNodes — reports success once the body parses;
/// ingest failures are logged.
async fn create_all_nodes(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<serde_json::Value> {
    let req = match CreateAllNodesRequest::from_body(&body) {
        Ok(req) => req,
        Err(e) => {
            error!("createAllNodes: invalid request body: {}", e);
            return Json(serde_json::json!({
                "error": format!("Invalid request body: {}", e),
            }));
        }
    };

    let options = req
        .options
        .unwrap_or_else(|| state.config.local_dev_options.clone());
    let location = state.csv_location();

    info!(
        "createAllNodes requested for s3://{}/{}",
        location.bucket, location.key
    );

    let source = state.sources.source(&options, &state.config).await;
    events::create_all_nodes(source.as_ref(), &state.node_store, &location).await;

    Json(serde_json::json!({ "success": true }))
}

async fn update_nodes() -> Json<serde_json::Value> {
    let status = events::update_nodes();
    Json(serde_json::json!({
        "status": status,
        "enabled": status == EventStatus::Enabled,
    }))
}

async fn enable(
    State(state): State<Arc<AppState>>,
    Json(event): Json<EnableEvent>,
) -> Json<serde_json::Value> {
    match events::on_enable(&event, state.host_client.as_ref()).await {
        Ok(response) => Json(serde_json::to_value(response).unwrap_or_default()),
        Err(e) => {
            error!("onEnable failed: {}", e);
            Json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}
