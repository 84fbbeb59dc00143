use chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool};

use super::{search_key, timestamp};
use crate::database::manager::DatabaseError;
use crate::database::repository::{Repository, Scope, Table};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub date: NaiveDateTime,
    pub bucketlist_id: i64,
}

impl Table for Tag {
    const TABLE: &'static str = "tags";
    const SEARCH_COLUMN: &'static str = "name_key";
    const LABEL: &'static str = "Tag";
}

impl Tag {
    pub fn bucketlist_scope(bucketlist_id: i64) -> Scope {
        Scope::new("bucketlist_id", bucketlist_id)
    }

    pub async fn create(pool: &SqlitePool, bucketlist_id: i64, name: &str) -> Result<Tag, DatabaseError> {
        let date = timestamp();
        let result = sqlx::query("INSERT INTO tags (name, name_key, date, bucketlist_id) VALUES (?, ?, ?, ?)")
            .bind(name)
            .bind(search_key(name))
            .bind(date)
            .bind(bucketlist_id)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Tag"))?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            date,
            bucketlist_id,
        })
    }

    pub async fn rename(pool: &SqlitePool, id: i64, name: &str) -> Result<Tag, DatabaseError> {
        sqlx::query("UPDATE tags SET name = ?, name_key = ? WHERE id = ?")
            .bind(name)
            .bind(search_key(name))
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Tag"))?;

        Repository::<Tag>::new(pool).select_404(id).await
    }

    /// Whether another tag in the bucketlist already uses `name` (case-insensitive)
    pub async fn name_taken(
        pool: &SqlitePool,
        bucketlist_id: i64,
        name: &str,
        except_id: Option<i64>,
    ) -> Result<bool, DatabaseError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tags WHERE bucketlist_id = ? AND name_key = ? AND id != ?",
        )
        .bind(bucketlist_id)
        .bind(search_key(name))
        .bind(except_id.unwrap_or(0))
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn for_item(pool: &SqlitePool, item_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.* FROM tags t
            JOIN item_tags it ON it.tag_id = t.id
            WHERE it.item_id = ?
            ORDER BY t.id
            "#,
        )
        .bind(item_id)
        .fetch_all(pool)
        .await?;
        Ok(tags)
    }

    /// The ids in `ids` that do not name a tag of the bucketlist
    pub async fn missing_ids(pool: &SqlitePool, bucketlist_id: i64, ids: &[i64]) -> Result<Vec<i64>, DatabaseError> {
        let existing: Vec<i64> = sqlx::query_scalar("SELECT id FROM tags WHERE bucketlist_id = ?")
            .bind(bucketlist_id)
            .fetch_all(pool)
            .await?;

        let mut missing: Vec<i64> = ids.iter().copied().filter(|id| !existing.contains(id)).collect();
        missing.sort_unstable();
        missing.dedup();
        Ok(missing)
    }
}
