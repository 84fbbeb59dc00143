use chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool};

use super::timestamp;
use crate::database::manager::DatabaseError;

/// The single active token of a user, stored as a digest
#[derive(Debug, Clone, FromRow)]
pub struct UserToken {
    pub id: i64,
    pub user_id: i64,
    pub token_digest: String,
    pub issued_at: NaiveDateTime,
}

impl UserToken {
    /// Record `digest` as the user's active token, replacing any previous one
    pub async fn store(pool: &SqlitePool, user_id: i64, digest: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO user_tokens (user_id, token_digest, issued_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                token_digest = excluded.token_digest,
                issued_at = excluded.issued_at
            "#,
        )
        .bind(user_id)
        .bind(digest)
        .bind(timestamp())
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_for_user(pool: &SqlitePool, user_id: i64) -> Result<Option<UserToken>, DatabaseError> {
        let token = sqlx::query_as::<_, UserToken>("SELECT * FROM user_tokens WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(token)
    }

    pub async fn revoke(pool: &SqlitePool, user_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM user_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
