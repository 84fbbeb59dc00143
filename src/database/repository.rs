use sqlx::{sqlite::SqliteRow, FromRow, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::database::models::search_key;

/// Static table metadata for models served through `Repository`
pub trait Table {
    const TABLE: &'static str;
    /// Lowercased column searched by the `q` list parameter
    const SEARCH_COLUMN: &'static str;
    /// Human-readable name used in not-found messages
    const LABEL: &'static str;
}

/// Restricts queries to the rows under one parent, e.g. `("user_id", 3)`
#[derive(Debug, Clone, Copy)]
pub struct Scope {
    pub column: &'static str,
    pub value: i64,
}

impl Scope {
    pub fn new(column: &'static str, value: i64) -> Self {
        Self { column, value }
    }
}

/// Window and search term for list queries
#[derive(Debug, Clone, Default)]
pub struct PageFilter {
    pub limit: i64,
    pub offset: i64,
    pub search: Option<String>,
}

pub struct Repository<'a, T> {
    pool: &'a SqlitePool,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> Repository<'a, T>
where
    T: Table + for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE id = ?", T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: i64) -> Result<T, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {} doesn't exist", T::LABEL, id)))
    }

    /// Row within a parent scope; rows under another parent are treated as missing
    pub async fn select_scoped(&self, scope: Scope, id: i64) -> Result<Option<T>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM \"{}\" WHERE id = ? AND \"{}\" = ?",
            T::TABLE,
            scope.column
        );
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(scope.value)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn select_all(&self, scope: Scope) -> Result<Vec<T>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM \"{}\" WHERE \"{}\" = ? ORDER BY id",
            T::TABLE,
            scope.column
        );
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(scope.value)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// One page of rows plus the total number of matches across all pages
    pub async fn select_page(
        &self,
        scope: Scope,
        filter: &PageFilter,
    ) -> Result<(Vec<T>, i64), DatabaseError> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let condition = match pattern {
            Some(_) => format!("\"{}\" = ? AND \"{}\" LIKE ? ESCAPE '\\'", scope.column, T::SEARCH_COLUMN),
            None => format!("\"{}\" = ?", scope.column),
        };

        let count_sql = format!("SELECT COUNT(*) FROM \"{}\" WHERE {}", T::TABLE, condition);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(scope.value);
        if let Some(pattern) = &pattern {
            count_query = count_query.bind(pattern.clone());
        }
        let total = count_query.fetch_one(self.pool).await?;

        let select_sql = format!(
            "SELECT * FROM \"{}\" WHERE {} ORDER BY id LIMIT ? OFFSET ?",
            T::TABLE,
            condition
        );
        let mut select_query = sqlx::query_as::<_, T>(&select_sql).bind(scope.value);
        if let Some(pattern) = &pattern {
            select_query = select_query.bind(pattern.clone());
        }
        let rows = select_query
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(self.pool)
            .await?;

        Ok((rows, total))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = ?", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Lowercased substring LIKE pattern with the wildcard characters of the term escaped
fn like_pattern(term: &str) -> String {
    let escaped = search_key(term)
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
