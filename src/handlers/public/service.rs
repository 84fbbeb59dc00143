use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::links::API_PREFIX;

/// GET /api/v1/ - Service info and endpoint map
pub async fn index(State(state): State<AppState>) -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Ok(ApiResponse::success(json!({
        "name": "Bucketlist API",
        "version": version,
        "description": "Create and track bucketlists, their items and tags",
        "environment": state.config.environment,
        "endpoints": {
            "register": format!("POST {}/auth/register (public)", API_PREFIX),
            "login": format!("POST {}/auth/login (public)", API_PREFIX),
            "refresh": format!("POST {}/auth/refresh (protected)", API_PREFIX),
            "logout": format!("POST {}/auth/logout (protected)", API_PREFIX),
            "user": format!("GET {}/auth/users/:id (protected)", API_PREFIX),
            "bucketlists": state.links.bucketlists(),
            "bucketlist": format!("{}/bucketlists/:id (protected)", API_PREFIX),
            "items": format!("{}/bucketlists/:id/items[/:item_id] (protected)", API_PREFIX),
            "tags": format!("{}/bucketlists/:id/tags[/:tag_id] (protected)", API_PREFIX),
            "health": "/health (public)",
        }
    })))
}

/// GET /health - Database ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": true,
                    "code": "SERVICE_UNAVAILABLE",
                    "message": "Database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
