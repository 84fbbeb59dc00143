use serde_json::{json, Map, Value};

use super::fields::{self, Field, DATE_FORMAT};
use super::{map_string, DumpSchema, Links, LoadMode, LoadSchema, ValidationErrors};
use crate::database::models::Tag;

pub struct TagSchema<'a> {
    pub links: &'a Links,
}

impl LoadSchema for TagSchema<'_> {
    /// The tag name; tags have no other writable field
    type Output = String;

    const LOAD_FIELDS: &'static [&'static str] = &["name"];
    const DUMP_ONLY: &'static [&'static str] = &["id", "bucketlist", "uri", "date"];

    fn pre_load(&self, mut data: Map<String, Value>) -> Map<String, Value> {
        map_string(&mut data, "name", |s| s.trim().to_string());
        data
    }

    fn load_fields(
        &self,
        data: &Map<String, Value>,
        _mode: LoadMode,
        errors: &mut ValidationErrors,
    ) -> Option<String> {
        Field::<String>::new("name")
            .required(true)
            .validate(fields::not_blank)
            .validate(fields::length(1, 50))
            .load(data, errors)
    }
}

impl DumpSchema<Tag> for TagSchema<'_> {
    fn dump_fields(&self, tag: &Tag) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("id".into(), json!(tag.id));
        data.insert("name".into(), json!(tag.name));
        data.insert("date".into(), json!(tag.date.format(DATE_FORMAT).to_string()));
        data.insert("bucketlist".into(), json!(tag.bucketlist_id));
        data.insert("uri".into(), json!(self.links.tag(tag.bucketlist_id, tag.id)));
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_limits_names() {
        let links = Links::default();
        let schema = TagSchema { links: &links };
        assert_eq!(schema.load(json!({"name": "  travel "}), LoadMode::Create).unwrap(), "travel");

        let err = schema.load(json!({"name": "x".repeat(51)}), LoadMode::Create).unwrap_err();
        assert_eq!(err.get("name").unwrap(), ["Longer than maximum length 50."]);
    }

    #[test]
    fn name_is_required_even_on_update() {
        let links = Links::default();
        let err = TagSchema { links: &links }.load(json!({}), LoadMode::Partial).unwrap_err();
        assert!(err.get("name").is_some());
    }
}
