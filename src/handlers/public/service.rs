use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service description
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let api = &state.config.api;

    Json(json!({
        "name": api.title,
        "api_version": api.version,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "users": "/register, /login (public); /refresh (refresh token); /logout, /user/:id (access token)",
            "stores": "/store, /store/:id (access token; delete requires admin)",
            "items": "/item, /item/:id (access token; create requires fresh token, delete requires admin)",
            "tags": "/store/:id/tag, /tag/:id, /item/:item_id/tag/:tag_id (access token; delete requires admin)",
        }
    }))
}

/// GET /health - Database connectivity check
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable",
                })),
            )
        }
    }
}
