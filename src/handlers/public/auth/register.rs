// handlers/public/auth/register.rs - POST /api/v1/auth/register handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::{DumpSchema, UserSchema};
use crate::services::AccountService;

/// POST /auth/register - Create a new user account
///
/// Input: `{"username", "email", "password"}`. Taken usernames or emails are
/// reported as field errors.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = payload?;

    let user = AccountService::new(state.db.pool(), &state.config.security)
        .register(body)
        .await?;

    Ok(ApiResponse::created(UserSchema { links: &state.links }.dump(&user)))
}
