use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use uuid::Uuid;

use crate::criteria::{Criterion, OrderSpec};
use crate::error::ApiError;
use crate::repository::{QueryResult, Repository};

/// Accessible-entity conveniences for a controller over one repository.
///
/// Implementors supply the repository and, optionally, the criteria that
/// scope what this controller may see; those criteria are merged into every
/// lookup and list query.
#[async_trait]
pub trait Controller {
    type Entity: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin;

    fn repository(&self) -> &Repository<Self::Entity>;

    fn accessible_criteria(&self) -> Vec<Criterion> {
        vec![]
    }

    /// Look up one entity by id within the accessible criteria.
    /// Ids that are not UUIDs short-circuit to None without touching the
    /// database.
    async fn accessible_entity(&self, id: &str) -> Result<Option<Self::Entity>, ApiError> {
        if !is_entity_id(id) {
            return Ok(None);
        }

        let criteria = merge_criteria(
            self.accessible_criteria(),
            vec![Criterion::eq("id", json!(id))],
        );
        Ok(self.repository().get_one_by_criteria(&criteria).await?)
    }

    /// List entities matching the caller's criteria within the accessible
    /// criteria
    async fn accessible_list(
        &self,
        criteria: Vec<Criterion>,
        order: Vec<OrderSpec>,
        skip: i64,
        limit: i64,
    ) -> Result<QueryResult<Self::Entity>, ApiError> {
        let merged = merge_criteria(self.accessible_criteria(), criteria);
        Ok(self
            .repository()
            .get_result_by_criteria(&merged, &order, skip, limit)
            .await?)
    }
}

pub fn is_entity_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

pub fn merge_criteria(accessible: Vec<Criterion>, extra: Vec<Criterion>) -> Vec<Criterion> {
    let mut merged = accessible;
    merged.extend(extra);
    merged
}

/// Map a missing entity to the standard 404 error
pub fn require_found<T>(entity: Option<T>) -> Result<T, ApiError> {
    entity.ok_or_else(ApiError::entity_not_found)
}
