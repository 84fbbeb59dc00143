use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::issue_token;
use crate::database::models::{User, UserToken};
use crate::error::ApiError;
use crate::schema::{DumpSchema, UserSchema};

/// Issue a JWT for `user` and make it the user's only active token
pub async fn issue_session(state: &AppState, user: &User) -> Result<Value, ApiError> {
    let issued = issue_token(user.id, &user.username, &state.config.security)?;
    UserToken::store(state.db.pool(), user.id, &issued.digest()).await?;

    tracing::debug!("Issued token for user {} (jti {})", user.id, issued.claims.jti);

    Ok(json!({
        "token": issued.token,
        "token_type": "Bearer",
        "expires_in": issued.claims.expires_in(),
        "user": UserSchema { links: &state.links }.dump(user),
    }))
}
