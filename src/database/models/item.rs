use chrono::NaiveDateTime;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};

use super::{search_key, timestamp, Tag};
use crate::database::manager::DatabaseError;
use crate::database::repository::{Repository, Scope, Table};

#[derive(Debug, Clone, FromRow)]
pub struct BucketlistItem {
    pub id: i64,
    pub description: String,
    pub done: bool,
    pub date: NaiveDateTime,
    pub date_modified: NaiveDateTime,
    pub bucketlist_id: i64,
}

/// An item together with the tags attached to it
#[derive(Debug, Clone)]
pub struct ItemWithTags {
    pub item: BucketlistItem,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub description: String,
    pub done: bool,
    pub date: Option<NaiveDateTime>,
    pub tags: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub description: Option<String>,
    pub done: Option<bool>,
    pub date: Option<NaiveDateTime>,
    /// Replaces the whole tag set when present
    pub tags: Option<Vec<i64>>,
}

impl Table for BucketlistItem {
    const TABLE: &'static str = "bucketlist_items";
    const SEARCH_COLUMN: &'static str = "description_key";
    const LABEL: &'static str = "Item";
}

impl BucketlistItem {
    pub fn bucketlist_scope(bucketlist_id: i64) -> Scope {
        Scope::new("bucketlist_id", bucketlist_id)
    }

    pub async fn create(pool: &SqlitePool, bucketlist_id: i64, new: &NewItem) -> Result<ItemWithTags, DatabaseError> {
        let now = timestamp();
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO bucketlist_items (description, description_key, done, date, date_modified, bucketlist_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.description)
        .bind(search_key(&new.description))
        .bind(new.done)
        .bind(new.date.unwrap_or(now))
        .bind(now)
        .bind(bucketlist_id)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        Self::replace_tags(&mut tx, id, &new.tags).await?;
        tx.commit().await?;

        Self::with_tags(pool, id).await
    }

    pub async fn update(pool: &SqlitePool, id: i64, changes: &ItemChanges) -> Result<ItemWithTags, DatabaseError> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE bucketlist_items
            SET description = COALESCE(?, description),
                description_key = COALESCE(?, description_key),
                done = COALESCE(?, done),
                date = COALESCE(?, date),
                date_modified = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.description.as_deref())
        .bind(changes.description.as_deref().map(search_key))
        .bind(changes.done)
        .bind(changes.date)
        .bind(timestamp())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(tags) = &changes.tags {
            Self::replace_tags(&mut tx, id, tags).await?;
        }
        tx.commit().await?;

        Self::with_tags(pool, id).await
    }

    pub async fn with_tags(pool: &SqlitePool, id: i64) -> Result<ItemWithTags, DatabaseError> {
        let item = Repository::<BucketlistItem>::new(pool).select_404(id).await?;
        let tags = Tag::for_item(pool, id).await?;
        Ok(ItemWithTags { item, tags })
    }

    /// Attach tags to each item, one query per item
    pub async fn attach_tags(pool: &SqlitePool, items: Vec<BucketlistItem>) -> Result<Vec<ItemWithTags>, DatabaseError> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let tags = Tag::for_item(pool, item.id).await?;
            out.push(ItemWithTags { item, tags });
        }
        Ok(out)
    }

    async fn replace_tags(tx: &mut Transaction<'_, Sqlite>, item_id: i64, tag_ids: &[i64]) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM item_tags WHERE item_id = ?")
            .bind(item_id)
            .execute(&mut **tx)
            .await?;

        for tag_id in tag_ids {
            sqlx::query("INSERT OR IGNORE INTO item_tags (item_id, tag_id) VALUES (?, ?)")
                .bind(item_id)
                .bind(tag_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}
