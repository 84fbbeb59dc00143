use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use super::ValidationErrors;

/// Wire format for every date field
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const MISSING: &str = "Missing data for required field.";
pub const NULL: &str = "Field may not be null.";

type Validator<'a, T> = Box<dyn Fn(&T) -> Result<(), String> + 'a>;

/// JSON value that a `Field` can deserialize into
pub trait FieldValue: Sized {
    fn from_json(value: &Value) -> Result<Self, String>;
}

impl FieldValue for String {
    fn from_json(value: &Value) -> Result<Self, String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "Not a valid string.".to_string())
    }
}

impl FieldValue for bool {
    fn from_json(value: &Value) -> Result<Self, String> {
        value.as_bool().ok_or_else(|| "Not a valid boolean.".to_string())
    }
}

impl FieldValue for i64 {
    fn from_json(value: &Value) -> Result<Self, String> {
        value.as_i64().ok_or_else(|| "Not a valid integer.".to_string())
    }
}

impl FieldValue for Vec<i64> {
    fn from_json(value: &Value) -> Result<Self, String> {
        let items = value.as_array().ok_or_else(|| "Not a valid list.".to_string())?;
        items
            .iter()
            .map(|item| item.as_i64().ok_or_else(|| "Not a valid integer.".to_string()))
            .collect()
    }
}

impl FieldValue for NaiveDateTime {
    fn from_json(value: &Value) -> Result<Self, String> {
        let s = value.as_str().ok_or_else(|| "Not a valid datetime.".to_string())?;
        NaiveDateTime::parse_from_str(s.trim(), DATE_FORMAT)
            .map_err(|_| format!("Not a valid datetime. Use the format {}.", DATE_FORMAT))
    }
}

/// One declared input field with its validators
pub struct Field<'a, T> {
    name: &'a str,
    required: bool,
    validators: Vec<Validator<'a, T>>,
}

impl<'a, T: FieldValue> Field<'a, T> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            required: false,
            validators: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn validate(mut self, validator: impl Fn(&T) -> Result<(), String> + 'a) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Read the field from `data`, recording every failure under the field name
    pub fn load(self, data: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<T> {
        let raw = match data.get(self.name) {
            None => {
                if self.required {
                    errors.add(self.name, MISSING);
                }
                return None;
            }
            Some(Value::Null) => {
                errors.add(self.name, NULL);
                return None;
            }
            Some(raw) => raw,
        };

        let value = match T::from_json(raw) {
            Ok(value) => value,
            Err(message) => {
                errors.add(self.name, message);
                return None;
            }
        };

        let mut valid = true;
        for validator in &self.validators {
            if let Err(message) = validator(&value) {
                errors.add(self.name, message);
                valid = false;
            }
        }
        valid.then_some(value)
    }
}

pub fn length(min: usize, max: usize) -> impl Fn(&String) -> Result<(), String> {
    move |value| {
        let len = value.chars().count();
        if len < min {
            Err(format!("Shorter than minimum length {}.", min))
        } else if len > max {
            Err(format!("Longer than maximum length {}.", max))
        } else {
            Ok(())
        }
    }
}

pub fn not_blank(value: &String) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("Field may not be blank.".to_string())
    } else {
        Ok(())
    }
}

pub fn username_chars(value: &String) -> Result<(), String> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Ok(())
    } else {
        Err("Username may only contain letters, digits, '_', '.' and '-'.".to_string())
    }
}

pub fn email(value: &String) -> Result<(), String> {
    let invalid = || Err(format!("{} is not a valid email address.", value));

    if value.chars().any(char::is_whitespace) {
        return invalid();
    }
    let Some((local, domain)) = value.split_once('@') else {
        return invalid();
    };
    if local.is_empty() || domain.contains('@') {
        return invalid();
    }
    let labels: Vec<&str> = domain.split('.').collect();
    let labels_ok = labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    if labels_ok {
        Ok(())
    } else {
        invalid()
    }
}
