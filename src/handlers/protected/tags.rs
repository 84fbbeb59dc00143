// handlers/protected/tags.rs - /api/v1/bucketlists/:id/tags[/:tag_id]

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde_json::Value;
use sqlx::SqlitePool;

use super::access::{bucketlist_tag, owned_bucketlist};
use crate::app::AppState;
use crate::database::models::Tag;
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::schema::{DumpSchema, ListQuery, LoadMode, LoadSchema, Page, PageSchema, PaginationSchema, TagSchema, ValidationErrors};

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

    let (tags, total) = Repository::<Tag>::new(pool)
        .select_page(Tag::bucketlist_scope(bucketlist.id), &params.filter())
        .await?;

    let schema = TagSchema { links: &state.links };
    let page = PageSchema::new("tags", &schema, &params, state.links.tags(bucketlist.id));
    Ok(ApiResponse::success(page.dump(&Page { records: tags.as_slice(), total })))
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
    let schema = TagSchema { links: &state.links };
    let name = schema.load(body, LoadMode::Create)?;
    check_unique(pool, bucketlist.id, &name, None).await?;

    let tag = Tag::create(pool, bucketlist.id, &name).await?;
    Ok(ApiResponse::created(schema.dump(&tag)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<Value> {
    let Path((id, tag_id)) = path?;
    let pool = state.db.pool();
    let bucketlist = owned_bucketlist(pool, &user, id).await?;
    let tag = bucketlist_tag(pool, &bucketlist, tag_id).await?;

    Ok(ApiResponse::success(TagSchema { links: &state.links }.dump(&tag)))
}

/// PUT - Rename a tag
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<(i64, i64)>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Path((id, tag_id)) = path?;
    let pool = state.db.pool();
    let bucketlist = owned_bucketlist(pool, &user, id).await?;
    let tag = bucketlist_tag(pool, &bucketlist, tag_id).await?;

    let Json(body) = payload?;
    let schema = TagSchema { links: &state.links };
    let name = schema.load(body, LoadMode::Partial)?;
    check_unique(pool, bucketlist.id, &name, Some(tag.id)).await?;

    let renamed = Tag::rename(pool, tag.id, &name).await?;
    Ok(ApiResponse::success(schema.dump(&renamed)))
}

/// DELETE - Also detaches the tag from every item
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<Value> {
    let Path((id, tag_id)) = path?;
    let pool = state.db.pool();
    let bucketlist = owned_bucketlist(pool, &user, id).await?;
    let tag = bucketlist_tag(pool, &bucketlist, tag_id).await?;

    Repository::<Tag>::new(pool).delete(tag.id).await?;
    Ok(ApiResponse::no_content())
}

async fn check_unique(pool: &SqlitePool, bucketlist_id: i64, name: &str, except: Option<i64>) -> Result<(), ApiError> {
    if Tag::name_taken(pool, bucketlist_id, name, except).await? {
        return Err(ValidationErrors::single(
            "name",
            format!("Tag {} already exists in this bucketlist.", name),
        )
        .into());
    }
    Ok(())
}
