use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "name": "Notes API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth/signup, /api/auth/login (public); /api/auth/me, /api/auth/password (bearer)",
            "notes": "/api/notes[/:id] (bearer)",
            "health": "/api/health (public)",
        }
    }))
}

/// GET /api/health - Liveness. Always 200; store reachability is reported in
/// the body rather than the status.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store = match state.store.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            "unavailable"
        }
    };

    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "store": store,
        "timestamp": chrono::Utc::now(),
    }))
}
