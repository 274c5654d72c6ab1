use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.retrieval.stats().await;

    Json(json!({
        "status": "ok",
        "chat_ready": state.chat_ready(),
        "retrieval_enabled": state.settings.retrieval.enabled,
        "embedder": state.retrieval.embedder_name(),
        "faq_count": stats.as_ref().map(|s| s.faq_count).unwrap_or(0),
        "indexed_at": stats.map(|s| s.indexed_at),
        "started_at": state.started_at,
    }))
}
