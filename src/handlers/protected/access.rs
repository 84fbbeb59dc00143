use crate::database::models::{Bucketlist, BucketlistItem, Tag};
use crate::database::{Repository, Table};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use sqlx::SqlitePool;

/// The bucketlist `id`, provided it belongs to the caller
pub async fn owned_bucketlist(pool: &SqlitePool, user: &AuthUser, id: i64) -> Result<Bucketlist, ApiError> {
    let bucketlist = Repository::<Bucketlist>::new(pool).select_404(id).await?;

    if !bucketlist.is_owned_by(user.id) {
        tracing::warn!("User {} denied access to bucketlist {}", user.id, id);
        return Err(ApiError::forbidden("You do not have permission to access this bucketlist"));
    }

    Ok(bucketlist)
}

pub async fn bucketlist_item(pool: &SqlitePool, bucketlist: &Bucketlist, id: i64) -> Result<BucketlistItem, ApiError> {
    Repository::<BucketlistItem>::new(pool)
        .select_scoped(BucketlistItem::bucketlist_scope(bucketlist.id), id)
        .await?
        .ok_or_else(|| missing_child::<BucketlistItem>(bucketlist, id))
}

pub async fn bucketlist_tag(pool: &SqlitePool, bucketlist: &Bucketlist, id: i64) -> Result<Tag, ApiError> {
    Repository::<Tag>::new(pool)
        .select_scoped(Tag::bucketlist_scope(bucketlist.id), id)
        .await?
        .ok_or_else(|| missing_child::<Tag>(bucketlist, id))
}

fn missing_child<T: Table>(bucketlist: &Bucketlist, id: i64) -> ApiError {
    ApiError::not_found(format!("{} {} doesn't exist in bucketlist {}", T::LABEL, id, bucketlist.id))
}
