use axum::{extract::State, Json};
use serde::Serialize;

use crate::llm_client::BackendKind;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BackendsResponse {
    pub default_backend: BackendKind,
    /// False means every generative path runs its rule-based fallback.
    pub default_available: bool,
    pub available: Vec<BackendKind>,
    pub min_call_interval_ms: u128,
}

/// GET /api/v1/backends
pub async fn backends_handler(State(state): State<AppState>) -> Json<BackendsResponse> {
    Json(BackendsResponse {
        default_backend: state.gateway.default_backend(),
        default_available: state.gateway.default_available(),
        available: state.gateway.available_backends(),
        min_call_interval_ms: state.config.min_call_interval.as_millis(),
    })
}
