// handlers/protected/items.rs - /api/v1/bucketlists/:id/items[/:item_id]

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde_json::Value;
use sqlx::SqlitePool;

use super::access::{bucketlist_item, owned_bucketlist};
use crate::app::AppState;
use crate::database::models::{Bucketlist, BucketlistItem, Tag};
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::schema::{DumpSchema, ItemSchema, ListQuery, LoadMode, LoadSchema, Page, PageSchema, PaginationSchema, ValidationErrors};

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let pool = state.db.pool();
    let bucketlist = owned_bucketlist(pool, &user, id).await?;

    let Query(query) = query?;
    let params = PaginationSchema::from_config(&state.config.api).load(&query)?;

    let (items, total) = Repository::<BucketlistItem>::new(pool)
        .select_page(BucketlistItem::bucketlist_scope(bucketlist.id), &params.filter())
        .await?;
    let items = BucketlistItem::attach_tags(pool, items).await?;

    let schema = ItemSchema { links: &state.links };
    let page = PageSchema::new("items", &schema, &params, state.links.items(bucketlist.id));
    Ok(ApiResponse::success(page.dump(&Page { records: items.as_slice(), total })))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let pool = state.db.pool();
    let bucketlist = owned_bucketlist(pool, &user, id).await?;

    let Json(body) = payload?;
    let schema = ItemSchema { links: &state.links };
    let new = schema.load(body, LoadMode::Create)?.into_new();
    check_tags(pool, &bucketlist, &new.tags).await?;

    let item = BucketlistItem::create(pool, bucketlist.id, &new).await?;
    Ok(ApiResponse::created(schema.dump(&item)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<Value> {
    let Path((id, item_id)) = path?;
    let pool = state.db.pool();
    let bucketlist = owned_bucketlist(pool, &user, id).await?;
    let item = bucketlist_item(pool, &bucketlist, item_id).await?;

    let item = BucketlistItem::with_tags(pool, item.id).await?;
    Ok(ApiResponse::success(ItemSchema { links: &state.links }.dump(&item)))
}

/// PUT - Partial update; a `tags` list replaces the item's current tags
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Path((id, item_id)) = path?;
    let pool = state.db.pool();
    let bucketlist = owned_bucketlist(pool, &user, id).await?;
    let item = bucketlist_item(pool, &bucketlist, item_id).await?;

    let Json(body) = payload?;
    let schema = ItemSchema { links: &state.links };
    let changes = schema.load(body, LoadMode::Partial)?.into_changes();
    if let Some(tags) = &changes.tags {
        check_tags(pool, &bucketlist, tags).await?;
    }

    let updated = BucketlistItem::update(pool, item.id, &changes).await?;
    Ok(ApiResponse::success(schema.dump(&updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<Value> {
    let Path((id, item_id)) = path?;
    let pool = state.db.pool();
    let bucketlist = owned_bucketlist(pool, &user, id).await?;
    let item = bucketlist_item(pool, &bucketlist, item_id).await?;

    Repository::<BucketlistItem>::new(pool).delete(item.id).await?;
    Ok(ApiResponse::no_content())
}

/// Every tag id must name a tag of this bucketlist
async fn check_tags(pool: &SqlitePool, bucketlist: &Bucketlist, tags: &[i64]) -> Result<(), ApiError> {
    if tags.is_empty() {
        return Ok(());
    }

    let missing = Tag::missing_ids(pool, bucketlist.id, tags).await?;
    if missing.is_empty() {
        return Ok(());
    }

    let ids: Vec<String> = missing.iter().map(i64::to_string).collect();
    Err(ValidationErrors::single(
        "tags",
        format!("Tag(s) {} don't exist in bucketlist {}.", ids.join(", "), bucketlist.id),
    )
    .into())
}
