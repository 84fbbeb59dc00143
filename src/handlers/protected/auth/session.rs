use axum::{extract::State, Extension};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{User, UserToken};
use crate::database::Repository;
use crate::handlers::public::auth::utils::issue_session;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// POST /auth/refresh - Swap the caller's token for a fresh one
pub async fn refresh(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    let user = Repository::<User>::new(state.db.pool()).select_404(auth.id).await?;
    Ok(ApiResponse::success(issue_session(&state, &user).await?))
}

/// POST /auth/logout - Revoke the caller's token
pub async fn logout(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    UserToken::revoke(state.db.pool(), auth.id).await?;
    tracing::info!("User {} logged out", auth.username);
    Ok(ApiResponse::message("You have been logged out successfully"))
}
