//! Request validation and response shaping.
//!
//! Loading runs `pre_load`, rejects unknown fields, validates every declared
//! field (collecting all errors in one pass) and finally runs `post_load` to
//! build the typed input. Dumping renders a model to a JSON object, adds
//! hyperlinks and runs `post_dump`; list envelopes are built by
//! `PageSchema::post_dump`.

pub mod bucketlist;
pub mod fields;
pub mod item;
pub mod links;
pub mod pagination;
pub mod tag;
pub mod user;

pub use bucketlist::BucketlistSchema;
pub use fields::Field;
pub use item::ItemSchema;
pub use links::Links;
pub use pagination::{ListQuery, Page, PageParams, PageSchema, PaginationSchema};
pub use tag::TagSchema;
pub use user::{LoginSchema, RegisterSchema, UserSchema};

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key for errors that belong to the payload as a whole
pub const SCHEMA_KEY: &str = "_schema";

/// Field name to error messages, serialized as `{"field": ["msg", ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Required fields must be present
    Create,
    /// Every field is optional, but at least one must be given
    Partial,
}

impl LoadMode {
    pub fn is_partial(self) -> bool {
        matches!(self, LoadMode::Partial)
    }
}

pub trait LoadSchema {
    type Output;

    /// Fields accepted on input
    const LOAD_FIELDS: &'static [&'static str];
    /// Output-only fields, ignored when they appear on input
    const DUMP_ONLY: &'static [&'static str] = &[];

    fn pre_load(&self, data: Map<String, Value>) -> Map<String, Value> {
        data
    }

    /// Validate declared fields; returns `None` when any field failed
    fn load_fields(
        &self,
        data: &Map<String, Value>,
        mode: LoadMode,
        errors: &mut ValidationErrors,
    ) -> Option<Self::Output>;

    fn post_load(&self, output: Self::Output) -> Result<Self::Output, ValidationErrors> {
        Ok(output)
    }

    fn load(&self, body: Value, mode: LoadMode) -> Result<Self::Output, ValidationErrors> {
        let data = match body {
            Value::Object(map) => map,
            _ => return Err(ValidationErrors::single(SCHEMA_KEY, "Invalid input type.")),
        };
        let data = self.pre_load(data);
        let mut errors = ValidationErrors::new();

        for key in data.keys() {
            if !Self::LOAD_FIELDS.contains(&key.as_str()) && !Self::DUMP_ONLY.contains(&key.as_str()) {
                errors.add(key.clone(), "Unknown field.");
            }
        }

        if mode.is_partial() && !data.keys().any(|k| Self::LOAD_FIELDS.contains(&k.as_str())) {
            errors.add(SCHEMA_KEY, "No data provided.");
        }

        let output = self.load_fields(&data, mode, &mut errors);
        match output {
            Some(output) if errors.is_empty() => self.post_load(output),
            _ => {
                if errors.is_empty() {
                    errors.add(SCHEMA_KEY, "Invalid input.");
                }
                Err(errors)
            }
        }
    }
}

pub trait DumpSchema<T> {
    fn dump_fields(&self, obj: &T) -> Map<String, Value>;

    fn post_dump(&self, data: Map<String, Value>) -> Map<String, Value> {
        data
    }

    fn dump(&self, obj: &T) -> Value {
        Value::Object(self.post_dump(self.dump_fields(obj)))
    }

    fn dump_many(&self, objs: &[T]) -> Vec<Value> {
        objs.iter().map(|obj| self.dump(obj)).collect()
    }
}

/// Apply `f` to a string field in place, leaving other types untouched
pub(crate) fn map_string(data: &mut Map<String, Value>, field: &str, f: impl Fn(&str) -> String) {
    if let Some(Value::String(s)) = data.get_mut(field) {
        *s = f(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct NameSchema;

    impl LoadSchema for NameSchema {
        type Output = Option<String>;
        const LOAD_FIELDS: &'static [&'static str] = &["name"];
        const DUMP_ONLY: &'static [&'static str] = &["id"];

        fn load_fields(
            &self,
            data: &Map<String, Value>,
            mode: LoadMode,
            errors: &mut ValidationErrors,
        ) -> Option<Self::Output> {
            let name = Field::<String>::new("name")
                .required(!mode.is_partial())
                .load(data, errors);
            errors.is_empty().then_some(name)
        }
    }

    #[test]
    fn rejects_non_objects() {
        let err = NameSchema.load(json!(["name"]), LoadMode::Create).unwrap_err();
        assert_eq!(err.get(SCHEMA_KEY).unwrap(), ["Invalid input type."]);
    }

    #[test]
    fn reports_unknown_fields_and_ignores_dump_only() {
        let err = NameSchema
            .load(json!({"name": "x", "id": 3, "colour": "blue"}), LoadMode::Create)
            .unwrap_err();
        assert_eq!(err.get("colour").unwrap(), ["Unknown field."]);
        assert!(err.get("id").is_none());
    }

    #[test]
    fn partial_load_requires_some_data() {
        let err = NameSchema.load(json!({"id": 1}), LoadMode::Partial).unwrap_err();
        assert_eq!(err.get(SCHEMA_KEY).unwrap(), ["No data provided."]);

        let loaded = NameSchema.load(json!({"name": "x"}), LoadMode::Partial).unwrap();
        assert_eq!(loaded.as_deref(), Some("x"));
    }

    #[test]
    fn serializes_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Missing data for required field.");
        errors.add("name", "Second.");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"name": ["Missing data for required field.", "Second."]})
        );
    }
}
