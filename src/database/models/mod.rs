pub mod bucketlist;
pub mod item;
pub mod tag;
pub mod token;
pub mod user;

pub use bucketlist::{Bucketlist, BucketlistChanges, NewBucketlist};
pub use item::{BucketlistItem, ItemChanges, ItemWithTags, NewItem};
pub use tag::Tag;
pub use token::UserToken;
pub use user::{NewUser, User};

use chrono::{NaiveDateTime, SubsecRound, Utc};

/// Lowercased shadow of a text column, used for case-insensitive search and uniqueness
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

/// Current UTC time at whole-second precision, matching the wire format
pub fn timestamp() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}
