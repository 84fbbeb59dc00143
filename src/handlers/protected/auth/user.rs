use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::User;
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::schema::{DumpSchema, UserSchema};

/// GET /auth/users/:id - Caller's own account details
pub async fn user_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let user = Repository::<User>::new(state.db.pool()).select_404(id).await?;

    if user.id != auth.id {
        return Err(ApiError::forbidden("You do not have permission to view this user"));
    }

    Ok(ApiResponse::success(UserSchema { links: &state.links }.dump(&user)))
}
