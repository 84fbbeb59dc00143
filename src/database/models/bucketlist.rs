use chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool};

use super::{search_key, timestamp};
use crate::database::manager::DatabaseError;
use crate::database::repository::{Repository, Scope, Table};

#[derive(Debug, Clone, FromRow)]
pub struct Bucketlist {
    pub id: i64,
    pub description: String,
    pub date: NaiveDateTime,
    pub date_modified: NaiveDateTime,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewBucketlist {
    pub description: String,
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct BucketlistChanges {
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
}

impl Table for Bucketlist {
    const TABLE: &'static str = "bucketlists";
    const SEARCH_COLUMN: &'static str = "description_key";
    const LABEL: &'static str = "Bucketlist";
}

impl Bucketlist {
    pub fn owner_scope(user_id: i64) -> Scope {
        Scope::new("user_id", user_id)
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    pub async fn create(pool: &SqlitePool, user_id: i64, new: &NewBucketlist) -> Result<Bucketlist, DatabaseError> {
        let now = timestamp();
        let date = new.date.unwrap_or(now);
        let result = sqlx::query(
            "INSERT INTO bucketlists (description, description_key, date, date_modified, user_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.description)
        .bind(search_key(&new.description))
        .bind(date)
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(Bucketlist {
            id: result.last_insert_rowid(),
            description: new.description.clone(),
            date,
            date_modified: now,
            user_id,
        })
    }

    pub async fn update(pool: &SqlitePool, id: i64, changes: &BucketlistChanges) -> Result<Bucketlist, DatabaseError> {
        sqlx::query(
            r#"
            UPDATE bucketlists
            SET description = COALESCE(?, description),
                description_key = COALESCE(?, description_key),
                date = COALESCE(?, date),
                date_modified = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.description.as_deref())
        .bind(changes.description.as_deref().map(search_key))
        .bind(changes.date)
        .bind(timestamp())
        .bind(id)
        .execute(pool)
        .await?;

        Repository::<Bucketlist>::new(pool).select_404(id).await
    }
}
