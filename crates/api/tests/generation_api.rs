//! Integration tests for `/generate-music` and its legacy alias.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, FakeService};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: structured completion becomes a generated result
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_returns_extracted_pattern() {
    let app = common::build_test_app(FakeService::up("CODE: stack(sound(\"bd\"))\nDESCRIPTION: test"));
    let response = post_json(app, "/generate-music", json!({"userInput": "make a beat"})).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["code"], "stack(sound(\"bd\"))");
    assert_eq!(json["description"], "test");
    assert_eq!(json["metadata"]["source"], "generated");
    assert_eq!(json["metadata"]["fallback_used"], false);
    assert_eq!(json["metadata"]["model"], "deepseek-r1:8b");
    assert!(json["metadata"]["timestamp"].is_string());
}

#[tokio::test]
async fn legacy_path_and_field_are_accepted() {
    let app = common::build_test_app(FakeService::up("CODE: stack(sound(\"bd\"))\nDESCRIPTION: test"));
    let response = post_json(
        app,
        "/api/generate-music",
        json!({"prompt": "make a beat", "musicDNA": {"primaryGenre": "techno", "energyLevel": 9}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["metadata"]["genre"], "techno");
}

// ---------------------------------------------------------------------------
// Test: service down yields a 200 fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn service_down_returns_genre_fallback() {
    let service = FakeService::down();
    let app = common::build_test_app(service.clone());
    let response = post_json(app, "/generate-music", json!({"userInput": "create a dark trap beat"})).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["metadata"]["source"], "fallback");
    assert_eq!(json["metadata"]["fallback_used"], true);
    assert_eq!(json["metadata"]["fallback_reason"], "service_unhealthy");
    assert_eq!(json["metadata"]["genre"], "trap");
    assert!(json["description"].as_str().unwrap().contains("trap"));
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn invalid_code_falls_back() {
    let app = common::build_test_app(FakeService::up("CODE: stack(stack(stack(stack(sound(\"bd\")"));
    let response = post_json(app, "/generate-music", json!({"userInput": "folk song"})).await;

    let json = body_json(response).await;
    assert_eq!(json["metadata"]["fallback_reason"], "invalid_code");
    assert_eq!(json["metadata"]["genre"], "country");
}

// ---------------------------------------------------------------------------
// Test: missing input is a 400 that still carries a pattern
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_input_returns_400_with_fallback() {
    let app = common::build_test_app(FakeService::up("unused"));
    let response = post_json(app, "/generate-music", json!({"userInput": "   "})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "No user input provided");
    assert_eq!(json["code"], "MISSING_INPUT");
    assert_eq!(json["output"]["success"], true);
    assert_eq!(json["output"]["metadata"]["fallback_reason"], "missing_input");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = common::build_test_app(FakeService::up("unused"));
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/generate-music")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert!(response.status().is_client_error());
}
