use chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool};

use super::timestamp;
use crate::auth::password::{verify_password, PasswordError};
use crate::database::manager::DatabaseError;
use crate::database::repository::Table;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl Table for User {
    const TABLE: &'static str = "users";
    const SEARCH_COLUMN: &'static str = "username";
    const LABEL: &'static str = "User";
}

impl User {
    pub async fn create(pool: &SqlitePool, new_user: &NewUser) -> Result<User, DatabaseError> {
        let created_at = timestamp();
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(created_at)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "User"))?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at,
        })
    }

    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn username_taken(pool: &SqlitePool, username: &str) -> Result<bool, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn email_taken(pool: &SqlitePool, email: &str) -> Result<bool, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn verify_password(&self, candidate: &str) -> Result<bool, PasswordError> {
        verify_password(candidate.to_string(), self.password_hash.clone()).await
    }
}
