use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::core::security::require_admin;
use crate::state::AppState;

pub async fn list_faqs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let faqs = state.retrieval.faqs().await;
    Json(json!({ "count": faqs.len(), "faqs": faqs }))
}

pub async fn reindex(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&headers, &state.admin_token)?;

    let stats = state.reload_faqs().await.map_err(|e| {
        tracing::error!("FAQ reindex failed: {}", e);
        ApiError::internal(e)
    })?;

    Ok(Json(json!({ "status": "success", "index": stats })))
}
