use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::criteria::{CriteriaError, OrderSpec, SortDirection};
use crate::error::ApiError;

pub const DEFAULT_SORT_FIELD: &str = "updatedAt";
pub const DEFAULT_SORT_DIRECTION: &str = "desc";

/// Sort selection from the `sort`/`by` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sort {
    pub sort: Option<String>,
    pub by: Option<String>,
}

impl Sort {
    pub fn sort(&self) -> &str {
        match self.sort.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => DEFAULT_SORT_FIELD,
        }
    }

    pub fn by(&self) -> &str {
        match self.by.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => DEFAULT_SORT_DIRECTION,
        }
    }

    /// The validated order spec; rejects directions other than asc/desc
    pub fn order(&self) -> Result<OrderSpec, CriteriaError> {
        Ok(OrderSpec::new(self.sort(), SortDirection::parse(self.by())?))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Sort
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(sort) = Query::<Sort>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(sort)
    }
}
