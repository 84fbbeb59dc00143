// handlers/public/auth/login.rs - POST /api/v1/auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use super::utils::issue_session;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AccountService;

/// POST /auth/login - Authenticate user and receive JWT token
///
/// Input: `{"username": "...", "password": "..."}`
///
/// Output: `{"token", "token_type": "Bearer", "expires_in", "user"}`. Any
/// earlier token for the same user stops working.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = payload?;

    let user = AccountService::new(state.db.pool(), &state.config.security)
        .authenticate(body)
        .await?;

    tracing::info!("User {} logged in", user.username);
    Ok(ApiResponse::success(issue_session(&state, &user).await?))
}
