use serde_json::{json, Map, Value};

use super::fields::{self, Field, DATE_FORMAT};
use super::{map_string, DumpSchema, Links, LoadMode, LoadSchema, ValidationErrors};
use crate::database::models::User;

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterSchema {
    pub password_min_length: usize,
}

impl LoadSchema for RegisterSchema {
    type Output = RegisterInput;

    const LOAD_FIELDS: &'static [&'static str] = &["username", "email", "password"];
    const DUMP_ONLY: &'static [&'static str] = &["id", "uri", "date_joined"];

    fn pre_load(&self, mut data: Map<String, Value>) -> Map<String, Value> {
        map_string(&mut data, "username", |s| s.trim().to_string());
        map_string(&mut data, "email", |s| s.trim().to_lowercase());
        data
    }

    fn load_fields(
        &self,
        data: &Map<String, Value>,
        _mode: LoadMode,
        errors: &mut ValidationErrors,
    ) -> Option<RegisterInput> {
        let min = self.password_min_length;

        let username = Field::<String>::new("username")
            .required(true)
            .validate(fields::not_blank)
            .validate(fields::length(1, 80))
            .validate(fields::username_chars)
            .load(data, errors);
        let email = Field::<String>::new("email")
            .required(true)
            .validate(fields::length(1, 120))
            .validate(fields::email)
            .load(data, errors);
        let password = Field::<String>::new("password")
            .required(true)
            .validate(move |p: &String| {
                if p.chars().count() < min {
                    Err(format!("Password must have more than {} characters.", min.saturating_sub(1)))
                } else {
                    Ok(())
                }
            })
            .load(data, errors);

        Some(RegisterInput {
            username: username?,
            email: email?,
            password: password?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub struct LoginSchema;

impl LoadSchema for LoginSchema {
    type Output = LoginInput;

    const LOAD_FIELDS: &'static [&'static str] = &["username", "password"];

    fn pre_load(&self, mut data: Map<String, Value>) -> Map<String, Value> {
        map_string(&mut data, "username", |s| s.trim().to_string());
        data
    }

    fn load_fields(
        &self,
        data: &Map<String, Value>,
        _mode: LoadMode,
        errors: &mut ValidationErrors,
    ) -> Option<LoginInput> {
        let username = Field::<String>::new("username")
            .required(true)
            .validate(fields::not_blank)
            .load(data, errors);
        let password = Field::<String>::new("password")
            .required(true)
            .validate(fields::not_blank)
            .load(data, errors);

        Some(LoginInput {
            username: username?,
            password: password?,
        })
    }
}

pub struct UserSchema<'a> {
    pub links: &'a Links,
}

impl DumpSchema<User> for UserSchema<'_> {
    fn dump_fields(&self, user: &User) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("id".into(), json!(user.id));
        data.insert("username".into(), json!(user.username));
        data.insert("email".into(), json!(user.email));
        data.insert("date_joined".into(), json!(user.created_at.format(DATE_FORMAT).to_string()));
        data.insert("uri".into(), json!(self.links.user(user.id)));
        data.insert("bucketlists_uri".into(), json!(self.links.bucketlists()));
        data
    }
}
