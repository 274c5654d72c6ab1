use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;

use crate::core::errors::ApiError;
use crate::core::security::require_admin;
use crate::state::AppState;

/// Effective configuration with secrets redacted.
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&headers, &state.admin_token)?;
    let config = state.config.load_config();
    Ok(Json(state.config.redact_sensitive_values(&config)))
}
