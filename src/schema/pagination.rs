use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{DumpSchema, Links, ValidationErrors};
use crate::config::ApiConfig;
use crate::database::PageFilter;

/// Raw list query string; values are validated by `PaginationSchema`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
    pub q: Option<String>,
}

impl PageParams {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    pub fn filter(&self) -> PageFilter {
        PageFilter {
            limit: i64::from(self.limit),
            offset: self.offset(),
            search: self.q.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PaginationSchema {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl PaginationSchema {
    pub fn from_config(api: &ApiConfig) -> Self {
        Self {
            default_limit: api.default_page_size.max(1),
            max_limit: api.max_page_size.max(1),
        }
    }

    pub fn load(&self, query: &ListQuery) -> Result<PageParams, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let page = Self::positive(query.page.as_deref(), "page", &mut errors).unwrap_or(1);
        let limit = Self::positive(query.limit.as_deref(), "limit", &mut errors)
            .unwrap_or(self.default_limit)
            .min(self.max_limit);
        errors.into_result()?;

        let q = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        Ok(PageParams { page, limit, q })
    }

    fn positive(raw: Option<&str>, field: &str, errors: &mut ValidationErrors) -> Option<u32> {
        let raw = raw?.trim();
        match raw.parse::<u32>() {
            Ok(n) if n >= 1 => Some(n),
            _ => {
                errors.add(field, "Must be a positive integer.");
                None
            }
        }
    }
}

/// One window of rows as returned by `Repository::select_page`
pub struct Page<'r, T> {
    pub records: &'r [T],
    pub total: i64,
}

/// Dumps a `Page` under `key` with `records`; `post_dump` adds totals and neighbour links
pub struct PageSchema<'a, S> {
    pub key: &'static str,
    pub records: &'a S,
    pub params: &'a PageParams,
    /// Collection link the `next`/`prev` query strings are appended to
    pub collection: String,
}

impl<'a, S> PageSchema<'a, S> {
    pub fn new(key: &'static str, records: &'a S, params: &'a PageParams, collection: String) -> Self {
        Self {
            key,
            records,
            params,
            collection,
        }
    }

    fn link(&self, target: i64) -> String {
        let mut query = vec![("page", target.to_string()), ("limit", self.params.limit.to_string())];
        if let Some(q) = &self.params.q {
            query.push(("q", q.clone()));
        }
        Links::with_query(self.collection.clone(), &query)
    }
}

impl<T, S: DumpSchema<T>> DumpSchema<Page<'_, T>> for PageSchema<'_, S> {
    fn dump_fields(&self, page: &Page<'_, T>) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(self.key.into(), Value::Array(self.records.dump_many(page.records)));
        data.insert("count".into(), json!(page.total));
        data
    }

    fn post_dump(&self, mut data: Map<String, Value>) -> Map<String, Value> {
        let total = data.get("count").and_then(Value::as_i64).unwrap_or(0);
        let limit = i64::from(self.params.limit);
        let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        let page = i64::from(self.params.page);

        let next = (page < pages).then(|| self.link(page + 1));
        let prev = (page > 1 && pages > 0).then(|| self.link((page - 1).min(pages)));

        data.insert("page".into(), json!(page));
        data.insert("pages".into(), json!(pages));
        data.insert("limit".into(), json!(limit));
        data.insert("next".into(), json!(next));
        data.insert("prev".into(), json!(prev));
        data
    }
}
