//! Integration tests for order placement.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use webstore_core::{DocumentId, ORDERS_COLLECTION};
use webstore_gateway::db::DocumentStore;
use webstore_integration_tests::{FailingStore, TestApp};

#[tokio::test]
async fn test_valid_order_is_stored() {
    let (app, store) = TestApp::in_memory();

    let order = json!({
        "customerName": "Ada",
        "phone": "07700900000",
        "cart": [{"lessonId": "65a1b2c3d4e5f60718293a4b", "spaces": 1}]
    });
    let response = app.post("/place-order", order).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["msg"], json!("Order placed successfully"));

    let order_id: DocumentId = body["orderId"].as_str().unwrap().parse().unwrap();
    let stored = store
        .find_by_id(ORDERS_COLLECTION, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get("customerName"), Some(&json!("Ada")));
    assert_eq!(stored.get("phone"), Some(&json!("07700900000")));
    assert_eq!(store.count(ORDERS_COLLECTION).await, 1);
}

#[tokio::test]
async fn test_placed_order_is_visible_through_collection_routes() {
    let (app, _store) = TestApp::in_memory();

    let response = app
        .post("/place-order", json!({"customerName": "Ada", "cart": [1]}))
        .await;
    let order_id = response.json()["orderId"].as_str().unwrap().to_string();

    let response = app.get("/collection/orders").await;
    let orders = response.json();
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["_id"], json!(order_id));
}

#[tokio::test]
async fn test_invalid_orders_are_rejected_without_insert() {
    let (app, store) = TestApp::in_memory();

    let invalid = [
        json!({"customerName": "Ada", "cart": []}),
        json!({"cart": [{"lessonId": "x"}]}),
        json!({"customerName": "", "cart": [1]}),
        json!({"customerName": null, "cart": [1]}),
        json!({"customerName": "Ada"}),
        json!({"customerName": "Ada", "cart": "lesson"}),
        json!({"customerName": "Ada", "cart": {"0": 1}}),
        json!(["not", "an", "object"]),
    ];

    for order in invalid {
        let response = app.post("/place-order", order.clone()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{order}");
        assert_eq!(response.json(), json!({"msg": "Invalid order data"}));
    }

    assert_eq!(store.count(ORDERS_COLLECTION).await, 0);
}

#[tokio::test]
async fn test_invalid_order_is_logged() {
    let (app, _store) = TestApp::in_memory();

    app.post("/place-order", json!({"cart": [1]})).await;

    assert_eq!(
        app.drain_activity().await,
        vec![
            "Request: POST /place-order".to_string(),
            "Invalid order data received".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_order_with_extra_fields_keeps_them() {
    let (app, store) = TestApp::in_memory();

    let response = app
        .post(
            "/place-order",
            json!({"customerName": "Ada", "cart": [1], "note": {"gift": true}}),
        )
        .await;
    let order_id: DocumentId = response.json()["orderId"].as_str().unwrap().parse().unwrap();

    let stored = store
        .find_by_id(ORDERS_COLLECTION, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get("note"), Some(&json!({"gift": true})));
}

#[tokio::test]
async fn test_store_failure_on_order_is_500() {
    let app = TestApp::with_store(Arc::new(FailingStore::new("write concern failed")));

    let response = app
        .post("/place-order", json!({"customerName": "Ada", "cart": [1]}))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Something went wrong!");

    let activity = app.drain_activity().await;
    assert!(
        activity
            .iter()
            .any(|line| line.starts_with("Error inserting order:") && line.contains("write concern failed")),
        "{activity:?}"
    );
}

#[tokio::test]
async fn test_malformed_order_json_is_generic_500() {
    let (app, store) = TestApp::in_memory();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/place-order")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{bad"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Something went wrong!");
    assert_eq!(store.count(ORDERS_COLLECTION).await, 0);

    let activity = app.drain_activity().await;
    assert_eq!(activity.len(), 2, "{activity:?}");
    assert_eq!(activity[0], "Request: POST /place-order");
    assert!(activity[1].starts_with("Error: Invalid JSON body"));
}
