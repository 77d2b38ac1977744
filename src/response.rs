use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::repository::QueryResult;

/// Wrap any payload in the standard `{"result": ...}` envelope
pub fn result(payload: impl Serialize) -> Json<Value> {
    Json(json!({ "result": payload }))
}

/// Wrap a paged query result in the list envelope:
/// `{"result": {"items": [...], "prev": ..., "next": ..., "count": ...}}`.
/// Absent cursors serialize as null.
pub fn query_result<T: Serialize>(query_result: &QueryResult<T>) -> Json<Value> {
    result(json!({
        "items": &query_result.items,
        "prev": query_result.prev,
        "next": query_result.next,
        "count": query_result.count,
    }))
}
