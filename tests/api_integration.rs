//! API integration tests
//!
//! These tests drive the real router over an in-memory SQLite store using
//! `tower::ServiceExt::oneshot`, covering the envelope contract and the
//! status-code mapping of every coupon endpoint.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use coupond::api;
use coupond::config::ApiConfig;
use coupond::storage::{CouponStore, SqliteStorage};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to create test storage
async fn create_test_store() -> Arc<dyn CouponStore> {
    let store = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    store.init().await.unwrap();
    Arc::new(store)
}

fn test_api_config() -> ApiConfig {
    ApiConfig {
        base_path: "/api".to_string(),
        version: "v1".to_string(),
    }
}

async fn test_app() -> Router {
    api::create_api_router(create_test_store().await, &test_api_config())
}

fn sample_payload(code: &str) -> Value {
    json!({
        "code": code,
        "discount_type": "percentage",
        "value": 10,
        "max_redemptions": 5,
        "expiry_date": "Mon Jan 2 15:04:05 MST 2030",
        "minimum_order_value": 0,
        "applicable_products": [1, 2, 3],
        "is_active": true,
        "user_specific": false
    })
}

fn post_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/coupon")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_list_placeholder_returns_empty_envelope() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/api/v1/coupon")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], json!(true));
    assert_eq!(json["message"], json!("Coupon Retrieved Successfully"));
    assert_eq!(json["data"], Value::Null);
}

#[tokio::test]
async fn test_create_coupon_returns_created_row() {
    let app = test_app().await;

    let response = app
        .oneshot(post_request(sample_payload("10OFF").to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], json!(true));
    assert_eq!(json["message"], json!("Coupon Created Successfully"));
    assert_eq!(json["data"]["code"], json!("10OFF"));
    assert_eq!(json["data"]["applicable_products"], json!([1, 2, 3]));
    assert!(json["data"]["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_get_coupon_by_id() {
    let app = test_app().await;

    let created = app
        .clone()
        .oneshot(post_request(sample_payload("10OFF").to_string()))
        .await
        .unwrap();
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(get_request(&format!("/api/v1/coupon/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], json!("Coupon Retrieved Successfully"));
    assert_eq!(json["data"]["code"], json!("10OFF"));
    assert_eq!(json["data"]["value"].as_f64().unwrap(), 10.0);
    assert_eq!(json["data"]["redeemed_count"], json!(0));
}

#[tokio::test]
async fn test_get_missing_coupon_returns_404() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/api/v1/coupon/999999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], json!("Coupon not found"));
}

#[tokio::test]
async fn test_get_non_integer_id_returns_400() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/api/v1/coupon/not-a-number"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("invalid coupon id"));
}

#[tokio::test]
async fn test_duplicate_code_returns_conflict() {
    let app = test_app().await;

    let first = app
        .clone()
        .oneshot(post_request(sample_payload("ONCE").to_string()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_request(sample_payload("ONCE").to_string()))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let json = body_json(second).await;
    assert_eq!(json["error"], json!("coupon code already exists"));
}

#[tokio::test]
async fn test_bad_expiry_date_returns_400_and_persists_nothing() {
    let app = test_app().await;

    let mut payload = sample_payload("EXPIRED");
    payload["expiry_date"] = json!("soon");

    let response = app
        .clone()
        .oneshot(post_request(payload.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("invalid expiry date"));

    // The failed create must not have left a row behind
    let lookup = app.oneshot(get_request("/api/v1/coupon/1")).await.unwrap();
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let app = test_app().await;

    let response = app
        .oneshot(post_request("{not json".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_are_stubs() {
    let app = test_app().await;

    let created = app
        .clone()
        .oneshot(post_request(sample_payload("KEEP").to_string()))
        .await
        .unwrap();
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let update = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/coupon/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);
    let json = body_json(update).await;
    assert_eq!(json["message"], json!("Coupon Updated Successfully"));
    assert_eq!(json["data"], Value::Null);

    let delete = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/coupon/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::OK);
    let json = body_json(delete).await;
    assert_eq!(json["message"], json!("Coupon Deleted Successfully"));

    // The coupon survives both stub calls unchanged
    let lookup = app
        .oneshot(get_request(&format!("/api/v1/coupon/{id}")))
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::OK);
    let json = body_json(lookup).await;
    assert_eq!(json["data"]["code"], json!("KEEP"));
}

#[tokio::test]
async fn test_concurrent_duplicate_creates() {
    // Concurrent creates of the same code: exactly one wins, the rest conflict
    let app = test_app().await;

    let mut handles = vec![];

    for _ in 0..10 {
        let app_clone = app.clone();
        let handle = tokio::spawn(async move {
            app_clone
                .oneshot(post_request(sample_payload("RACE").to_string()))
                .await
                .unwrap()
        });
        handles.push(handle);
    }

    let mut created_count = 0;
    let mut conflict_count = 0;

    for handle in handles {
        let response = handle.await.unwrap();
        match response.status() {
            StatusCode::CREATED => created_count += 1,
            StatusCode::CONFLICT => conflict_count += 1,
            other => panic!("Unexpected status: {other}"),
        }
    }

    assert_eq!(created_count, 1, "Exactly one creation should succeed");
    assert_eq!(conflict_count, 9, "All others should get conflict");
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
