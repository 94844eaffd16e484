//! Event sync endpoint

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use calfeed_core::userid::encode_identifier;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sync", post(sync_events))
}

/// Request body for syncing a user's events
#[derive(Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub events: Vec<Value>,
}

#[derive(Serialize)]
pub struct SyncResponse {
    pub status: &'static str,
    pub stored_count: usize,
    pub feed_url: String,
}

/// POST /api/sync - Replace a user's event collection
async fn sync_events(
    State(state): State<AppState>,
    Json(req): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, AppError> {
    let stored_count = state.service.sync(&req.identifier, &req.events)?;

    let key = encode_identifier(&req.identifier);
    Ok(Json(SyncResponse {
        status: "ok",
        stored_count,
        feed_url: format!("/calendar/{key}.ics"),
    }))
}
