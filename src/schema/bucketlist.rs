use chrono::NaiveDateTime;
use serde_json::{json, Map, Value};

use super::fields::{self, Field, DATE_FORMAT};
use super::{map_string, DumpSchema, ItemSchema, Links, LoadMode, LoadSchema, TagSchema, ValidationErrors};
use crate::database::models::{Bucketlist, BucketlistChanges, ItemWithTags, NewBucketlist, Tag};

/// Validated bucketlist payload; `description` is always set on create
#[derive(Debug, Clone, Default)]
pub struct BucketlistInput {
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
}

impl BucketlistInput {
    pub fn into_new(self) -> NewBucketlist {
        NewBucketlist {
            description: self.description.unwrap_or_default(),
            date: self.date,
        }
    }

    pub fn into_changes(self) -> BucketlistChanges {
        BucketlistChanges {
            description: self.description,
            date: self.date,
        }
    }
}

pub struct BucketlistSchema<'a> {
    pub links: &'a Links,
}

impl BucketlistSchema<'_> {
    /// Bucketlist with its items (each carrying its tags) and its tags nested
    pub fn dump_detail(&self, bucketlist: &Bucketlist, items: &[ItemWithTags], tags: &[Tag]) -> Value {
        let item_schema = ItemSchema { links: self.links };
        let tag_schema = TagSchema { links: self.links };

        let mut data = self.dump_fields(bucketlist);
        data.insert("items".into(), Value::Array(item_schema.dump_many(items)));
        data.insert("tags".into(), Value::Array(tag_schema.dump_many(tags)));
        Value::Object(self.post_dump(data))
    }
}

impl LoadSchema for BucketlistSchema<'_> {
    type Output = BucketlistInput;

    const LOAD_FIELDS: &'static [&'static str] = &["description", "date"];
    const DUMP_ONLY: &'static [&'static str] = &[
        "id",
        "user",
        "uri",
        "items_uri",
        "tags_uri",
        "date_modified",
        "items",
        "tags",
    ];

    fn pre_load(&self, mut data: Map<String, Value>) -> Map<String, Value> {
        map_string(&mut data, "description", |s| s.trim().to_string());
        data
    }

    fn load_fields(
        &self,
        data: &Map<String, Value>,
        mode: LoadMode,
        errors: &mut ValidationErrors,
    ) -> Option<BucketlistInput> {
        let description = Field::<String>::new("description")
            .required(!mode.is_partial())
            .validate(fields::not_blank)
            .validate(fields::length(1, 300))
            .load(data, errors);
        let date = Field::<NaiveDateTime>::new("date").load(data, errors);

        errors.is_empty().then_some(BucketlistInput { description, date })
    }
}

impl DumpSchema<Bucketlist> for BucketlistSchema<'_> {
    fn dump_fields(&self, bucketlist: &Bucketlist) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("id".into(), json!(bucketlist.id));
        data.insert("description".into(), json!(bucketlist.description));
        data.insert("date".into(), json!(bucketlist.date.format(DATE_FORMAT).to_string()));
        data.insert(
            "date_modified".into(),
            json!(bucketlist.date_modified.format(DATE_FORMAT).to_string()),
        );
        data.insert("user".into(), json!(bucketlist.user_id));
        data.insert("uri".into(), json!(self.links.bucketlist(bucketlist.id)));
        data.insert("items_uri".into(), json!(self.links.items(bucketlist.id)));
        data.insert("tags_uri".into(), json!(self.links.tags(bucketlist.id)));
        data
    }
}
