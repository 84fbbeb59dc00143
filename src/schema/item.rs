use chrono::NaiveDateTime;
use serde_json::{json, Map, Value};

use super::fields::{self, Field, DATE_FORMAT};
use super::{map_string, DumpSchema, Links, LoadMode, LoadSchema, TagSchema, ValidationErrors};
use crate::database::models::{ItemChanges, ItemWithTags, NewItem};

#[derive(Debug, Clone, Default)]
pub struct ItemInput {
    pub description: Option<String>,
    pub done: Option<bool>,
    pub date: Option<NaiveDateTime>,
    pub tags: Option<Vec<i64>>,
}

impl ItemInput {
    pub fn into_new(self) -> NewItem {
        NewItem {
            description: self.description.unwrap_or_default(),
            done: self.done.unwrap_or(false),
            date: self.date,
            tags: self.tags.unwrap_or_default(),
        }
    }

    pub fn into_changes(self) -> ItemChanges {
        ItemChanges {
            description: self.description,
            done: self.done,
            date: self.date,
            tags: self.tags,
        }
    }
}

pub struct ItemSchema<'a> {
    pub links: &'a Links,
}

impl LoadSchema for ItemSchema<'_> {
    type Output = ItemInput;

    const LOAD_FIELDS: &'static [&'static str] = &["description", "done", "date", "tags"];
    const DUMP_ONLY: &'static [&'static str] = &["id", "bucketlist", "bucketlist_id", "uri", "date_modified"];

    fn pre_load(&self, mut data: Map<String, Value>) -> Map<String, Value> {
        map_string(&mut data, "description", |s| s.trim().to_string());
        data
    }

    fn load_fields(
        &self,
        data: &Map<String, Value>,
        mode: LoadMode,
        errors: &mut ValidationErrors,
    ) -> Option<ItemInput> {
        let description = Field::<String>::new("description")
            .required(!mode.is_partial())
            .validate(fields::not_blank)
            .validate(fields::length(1, 300))
            .load(data, errors);
        let done = Field::<bool>::new("done").load(data, errors);
        let date = Field::<NaiveDateTime>::new("date").load(data, errors);
        let tags = Field::<Vec<i64>>::new("tags").load(data, errors);

        errors.is_empty().then_some(ItemInput {
            description,
            done,
            date,
            tags,
        })
    }

    fn post_load(&self, mut input: ItemInput) -> Result<ItemInput, ValidationErrors> {
        if let Some(tags) = input.tags.as_mut() {
            tags.sort_unstable();
            tags.dedup();
        }
        Ok(input)
    }
}

impl DumpSchema<ItemWithTags> for ItemSchema<'_> {
    fn dump_fields(&self, record: &ItemWithTags) -> Map<String, Value> {
        let item = &record.item;
        let tag_schema = TagSchema { links: self.links };

        let mut data = Map::new();
        data.insert("id".into(), json!(item.id));
        data.insert("description".into(), json!(item.description));
        data.insert("done".into(), json!(item.done));
        data.insert("date".into(), json!(item.date.format(DATE_FORMAT).to_string()));
        data.insert("date_modified".into(), json!(item.date_modified.format(DATE_FORMAT).to_string()));
        data.insert("bucketlist".into(), json!(item.bucketlist_id));
        data.insert("uri".into(), json!(self.links.item(item.bucketlist_id, item.id)));
        data.insert("tags".into(), Value::Array(tag_schema.dump_many(&record.tags)));
        data
    }
}
