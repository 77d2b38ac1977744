use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_LIMIT: i64 = 25;

/// Paging window from the `skip`/`limit` query parameters.
///
/// Values are kept as raw strings and parsed leniently: anything that does
/// not parse as an integer counts as unset. A zero or unset limit falls back
/// to the default of 25.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    pub skip: Option<String>,
    pub limit: Option<String>,
}

impl Paging {
    pub fn skip(&self) -> i64 {
        parse_or_zero(self.skip.as_deref()).max(0)
    }

    pub fn limit(&self) -> i64 {
        let parsed = parse_or_zero(self.limit.as_deref());
        let limit = if parsed <= 0 { DEFAULT_LIMIT } else { parsed };

        match crate::config::CONFIG.paging.max_limit {
            Some(max) if limit > max => {
                if crate::config::CONFIG.paging.debug_logging {
                    tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max);
                }
                max
            }
            _ => limit,
        }
    }
}

fn parse_or_zero(value: Option<&str>) -> i64 {
    value
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Paging
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(paging) = Query::<Paging>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(paging)
    }
}
