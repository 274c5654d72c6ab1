use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::chat::ChatError;
use crate::core::errors::ApiError;
use crate::state::AppState;

/// `POST /api/chat/` with `{"query": "..."}`.
///
/// The body is parsed by hand so that malformed JSON gets the same
/// `{"error": "No query provided"}` answer as a missing query.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let orchestrator = state.chat()?;

    let query = extract_query(&body).ok_or(ChatError::Validation)?;
    let reply = orchestrator.respond(&query).await?;

    Ok(Json(json!({ "response": reply.text })))
}

fn extract_query(body: &[u8]) -> Option<String> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    let query = payload.as_object()?.get("query")?.as_str()?;
    if query.trim().is_empty() {
        return None;
    }
    Some(query.to_string())
}
