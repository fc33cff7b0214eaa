//! Test-harness endpoints for the entity store.

use crate::services::StoreStats;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

/// Drop every entity so the next suite starts from an empty store.
pub async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    state.store.reset().await;
    Json(json!({ "status": "reset" }))
}

pub async fn stats(State(state): State<AppState>) -> Json<StoreStats> {
    Json(state.store.stats().await)
}
