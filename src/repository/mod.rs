use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, PgPool, Row};
use thiserror::Error;

use crate::criteria::{Criteria, CriteriaError, Criterion, OrderSpec, SqlResult};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Query returned more than one record from \"{0}\"")]
    NonUnique(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<CriteriaError> for DatabaseError {
    fn from(err: CriteriaError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

/// One page of a criteria query plus skip-based cursors.
///
/// `prev`/`next` are skip values for the adjacent pages, absent at the
/// edges; `count` is the total matching rows ignoring paging.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub prev: Option<i64>,
    pub next: Option<i64>,
    pub count: i64,
}

impl<T> QueryResult<T> {
    pub fn new(items: Vec<T>, skip: i64, limit: i64, count: i64) -> Self {
        let prev = if skip > 0 {
            Some((skip - limit).max(0))
        } else {
            None
        };
        let next = if limit > 0 && skip + limit < count {
            Some(skip + limit)
        } else {
            None
        };
        Self {
            items,
            prev,
            next,
            count,
        }
    }
}

/// Criteria-driven queries against a single table
pub struct Repository<T> {
    table_name: String,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize,
{
    pub fn new(table_name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            table_name: table_name.into(),
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Fetch at most one record matching the criteria. Two or more matches
    /// are an error rather than a silent first-row pick.
    pub async fn get_one_by_criteria(
        &self,
        criteria: &[Criterion],
    ) -> Result<Option<T>, DatabaseError> {
        let mut query = Criteria::new(&self.table_name)?;
        query.criteria(criteria)?.limit(2, None)?;

        let mut rows = self.fetch_all(query.to_sql()?).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            _ => Err(DatabaseError::NonUnique(self.table_name.clone())),
        }
    }

    /// Fetch a page of records plus the total count over the same criteria
    pub async fn get_result_by_criteria(
        &self,
        criteria: &[Criterion],
        order: &[OrderSpec],
        skip: i64,
        limit: i64,
    ) -> Result<QueryResult<T>, DatabaseError> {
        let mut query = Criteria::new(&self.table_name)?;
        query
            .criteria(criteria)?
            .order(order)?
            .limit(limit, Some(skip))?;

        let items = self.fetch_all(query.to_sql()?).await?;
        let count = self.fetch_count(query.to_count_sql()?).await?;

        Ok(QueryResult::new(items, skip, limit, count))
    }

    async fn fetch_all(&self, sql_result: SqlResult) -> Result<Vec<T>, DatabaseError> {
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn fetch_count(&self, sql_result: SqlResult) -> Result<i64, DatabaseError> {
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                // Postgres doesn't have u64; cast down if safe
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) => {
            // Arrays are expanded into placeholders before binding
            q
        }
        Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) => q,
        Value::Object(_) => q.bind(v.clone()),
    }
}
