use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness only: never touches the vote store.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": 200 }))
}
