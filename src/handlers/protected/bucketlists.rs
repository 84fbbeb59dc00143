// handlers/protected/bucketlists.rs - /api/v1/bucketlists[/:id]

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde_json::Value;

use super::access::owned_bucketlist;
use crate::app::AppState;
use crate::database::models::{Bucketlist, BucketlistItem, Tag};
use crate::database::Repository;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::schema::{BucketlistSchema, DumpSchema, ListQuery, LoadMode, LoadSchema, Page, PageSchema, PaginationSchema};

/// GET /bucketlists - Caller's bucketlists, paginated and searchable with `q`
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(query) = query?;
    let params = PaginationSchema::from_config(&state.config.api).load(&query)?;

    let (bucketlists, total) = Repository::<Bucketlist>::new(state.db.pool())
        .select_page(Bucketlist::owner_scope(user.id), &params.filter())
        .await?;

    let schema = BucketlistSchema { links: &state.links };
    let page = PageSchema::new("bucketlists", &schema, &params, state.links.bucketlists());
    Ok(ApiResponse::success(page.dump(&Page { records: bucketlists.as_slice(), total })))
}

/// POST /bucketlists - Create a bucketlist owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = payload?;
    let schema = BucketlistSchema { links: &state.links };
    let input = schema.load(body, LoadMode::Create)?;

    let bucketlist = Bucketlist::create(state.db.pool(), user.id, &input.into_new()).await?;
    tracing::debug!("User {} created bucketlist {}", user.id, bucketlist.id);

    Ok(ApiResponse::created(schema.dump(&bucketlist)))
}

/// GET /bucketlists/:id - Bucketlist with its items and tags nested
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let pool = state.db.pool();
    let bucketlist = owned_bucketlist(pool, &user, id).await?;

    let items = Repository::<BucketlistItem>::new(pool)
        .select_all(BucketlistItem::bucketlist_scope(bucketlist.id))
        .await?;
    let items = BucketlistItem::attach_tags(pool, items).await?;
    let tags = Repository::<Tag>::new(pool)
        .select_all(Tag::bucketlist_scope(bucketlist.id))
        .await?;

    let schema = BucketlistSchema { links: &state.links };
    Ok(ApiResponse::success(schema.dump_detail(&bucketlist, &items, &tags)))
}

/// PUT /bucketlists/:id - Partial update; `date_modified` is refreshed
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let bucketlist = owned_bucketlist(state.db.pool(), &user, id).await?;

    let Json(body) = payload?;
    let schema = BucketlistSchema { links: &state.links };
    let changes = schema.load(body, LoadMode::Partial)?.into_changes();

    let updated = Bucketlist::update(state.db.pool(), bucketlist.id, &changes).await?;
    Ok(ApiResponse::success(schema.dump(&updated)))
}

/// DELETE /bucketlists/:id - Removes the bucketlist with its items and tags
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let bucketlist = owned_bucketlist(state.db.pool(), &user, id).await?;

    Repository::<Bucketlist>::new(state.db.pool()).delete(bucketlist.id).await?;
    tracing::debug!("User {} deleted bucketlist {}", user.id, bucketlist.id);

    Ok(ApiResponse::no_content())
}
