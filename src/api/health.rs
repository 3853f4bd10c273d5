use axum::extract::State;
use axum::Json;

use crate::api::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once at least one insurer can be priced.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let active_insurers = state.engine.registry().list_active_configs().count();
    let status = if active_insurers > 0 { "ready" } else { "degraded" };
    Json(serde_json::json!({"status": status, "activeInsurers": active_insurers}))
}
