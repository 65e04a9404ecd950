use axum::Json;

/// GET /api/health — liveness probe with the current timestamp.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": uwork_core::service::now_iso(),
    }))
}
