use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /api/health
pub async fn health(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "cluster": app.cluster_name,
    }))
}
