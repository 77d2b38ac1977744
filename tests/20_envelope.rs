mod common;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::json;

use controller_helper::error::ApiError;
use controller_helper::repository::QueryResult;
use controller_helper::response;

fn app() -> Router {
    Router::new()
        .route(
            "/one",
            get(|| async { response::result(json!({ "id": "abc", "title": "hello" })) }),
        )
        .route(
            "/list",
            get(|| async {
                let items = vec![json!({ "title": "a" }), json!({ "title": "b" })];
                response::query_result(&QueryResult::new(items, 0, 25, 2))
            }),
        )
        .route(
            "/paged",
            get(|| async {
                let items = vec![json!({ "title": "c" })];
                response::query_result(&QueryResult::new(items, 50, 25, 100))
            }),
        )
        .route("/missing", get(|| async { ApiError::entity_not_found() }))
}

#[tokio::test]
async fn result_envelope_wraps_payload() {
    let (status, body) = common::get(app(), "/one").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": { "id": "abc", "title": "hello" } }));
}

#[tokio::test]
async fn list_envelope_has_items_cursors_and_count() {
    let (status, body) = common::get(app(), "/list").await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_eq!(result["items"].as_array().unwrap().len(), 2);
    assert_eq!(result["count"], 2);
    // Single page: cursors present but null
    assert!(result.get("prev").is_some());
    assert!(result["prev"].is_null());
    assert!(result["next"].is_null());
}

#[tokio::test]
async fn list_envelope_carries_cursor_values() {
    let (_, body) = common::get(app(), "/paged").await;

    assert_eq!(body["result"]["prev"], 25);
    assert_eq!(body["result"]["next"], 75);
    assert_eq!(body["result"]["count"], 100);
}

#[tokio::test]
async fn error_envelope_has_status_message_and_code() {
    let (status, body) = common::get(app(), "/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "Entity not found");
    assert_eq!(body["code"], "ENTITY_NOT_FOUND");
}
