use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{answer, correct_id, create_test_app, default_seed, send, start_session, wrong_id};

#[tokio::test]
async fn test_start_session_returns_three_options_without_answer() {
    let app = create_test_app(default_seed());
    let (_, body) = start_session(&app, "ayse", "jeans").await;

    let options = body["question"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 3);
    assert!(body["question"].get("correct_id").is_none());
    assert_eq!(body["question"]["time_limit_seconds"], 15);
    assert_eq!(body["session"]["status"], "active");
    assert_eq!(body["session"]["score"], 0);
    assert_eq!(body["session"]["total_available_questions"], 3);

    let mut ids: Vec<_> = options.iter().map(|o| o["id"].as_str().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, vec!["j-loose", "j-regular", "j-slim"]);
}

#[tokio::test]
async fn test_three_record_category_plays_to_pool_exhaustion() {
    let app = create_test_app(default_seed());
    let (id, _) = start_session(&app, "ayse", "jeans").await;

    let first = correct_id(&app, &id).await;
    let (status, body) = answer(&app, "ayse", &id, Some(&first)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], true);
    assert_eq!(body["current_streak"], 1);
    assert_eq!(body["game_over"], false);

    let second = correct_id(&app, &id).await;
    assert_ne!(first, second);
    let (_, body) = answer(&app, "ayse", &id, Some(&second)).await;
    assert_eq!(body["current_streak"], 2);
    assert_eq!(body["score"], 20);

    let third = correct_id(&app, &id).await;
    assert_ne!(third, first);
    assert_ne!(third, second);
    let (status, body) = answer(&app, "ayse", &id, Some(&third)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 30);
    assert_eq!(body["game_over"], true);
    assert_eq!(body["end_reason"], "pool_exhausted");
    assert!(body["next_question"].is_null());
    assert_eq!(body["summary"]["total_questions"], 3);

    let (_, view) = send(&app, "GET", &format!("/api/v1/sessions/{}", id), Some("ayse"), None).await;
    assert_eq!(view["status"], "ended");
    assert!(view["question"].is_null());
}

#[tokio::test]
async fn test_wrong_answer_ends_session_with_feedback() {
    let app = create_test_app(default_seed());
    let (id, _) = start_session(&app, "ayse", "shirts").await;

    let right = correct_id(&app, &id).await;
    answer(&app, "ayse", &id, Some(&right)).await;

    let wrong = wrong_id(&app, &id).await;
    let (status, body) = answer(&app, "ayse", &id, Some(&wrong)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], false);
    assert_eq!(body["current_streak"], 0);
    assert_eq!(body["highest_streak"], 1);
    assert_eq!(body["score"], 10);
    assert_eq!(body["end_reason"], "wrong_answer");
    assert!(body["feedback"]["correct_explanation"]
        .as_str()
        .unwrap()
        .starts_with("How to recognise"));
    assert_eq!(
        body["feedback"]["selected_name"],
        format!("Fit {}", wrong).as_str()
    );
}

#[tokio::test]
async fn test_null_answer_is_timeout() {
    let app = create_test_app(default_seed());
    let (id, _) = start_session(&app, "ayse", "jeans").await;

    let (status, body) = answer(&app, "ayse", &id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["end_reason"], "timeout");
    assert_eq!(body["points_awarded"], 0);
    assert!(body["feedback"]["selected_name"].is_null());
}

#[tokio::test]
async fn test_answer_after_end_is_rejected() {
    let app = create_test_app(default_seed());
    let (id, _) = start_session(&app, "ayse", "shirts").await;
    let right = correct_id(&app, &id).await;
    answer(&app, "ayse", &id, Some(&right)).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/sessions/{}/complete", id),
        Some("ayse"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = answer(&app, "ayse", &id, Some("s-linen")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "invalid_transition");

    let (_, view) = send(&app, "GET", &format!("/api/v1/sessions/{}", id), Some("ayse"), None).await;
    assert_eq!(view["score"], 10);
    assert_eq!(view["current_streak"], 1);
    assert_eq!(view["end_reason"], "player_quit");
}

#[tokio::test]
async fn test_unknown_option_returns_400() {
    let app = create_test_app(default_seed());
    let (id, _) = start_session(&app, "ayse", "jeans").await;

    let (status, body) = answer(&app, "ayse", &id, Some("not-an-option")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_option");
}

#[tokio::test]
async fn test_other_player_cannot_answer() {
    let app = create_test_app(default_seed());
    let (id, _) = start_session(&app, "ayse", "jeans").await;
    let right = correct_id(&app, &id).await;

    let (status, body) = answer(&app, "mehmet", &id, Some(&right)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

#[tokio::test]
async fn test_start_rejects_unknown_and_small_categories() {
    let app = create_test_app(default_seed());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/sessions",
        Some("ayse"),
        Some(json!({ "category_id": "hats" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "category_not_found");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/sessions",
        Some("ayse"),
        Some(json!({ "category_id": "tiny" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "insufficient_content");
}

#[tokio::test]
async fn test_malformed_body_uses_json_error_shape() {
    let app = create_test_app(default_seed());
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/sessions",
        Some("ayse"),
        Some(json!({ "category": "jeans" })),
    )
    .await;
    assert!(status.is_client_error());
    assert_eq!(body["code"], "invalid_body");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = create_test_app(default_seed());
    let (status, body) = send(&app, "GET", "/api/v1/categories", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn test_all_categories_session_spans_regular_categories() {
    let app = create_test_app(default_seed());
    let (_, body) = start_session(&app, "ayse", "all").await;
    assert_eq!(body["session"]["total_available_questions"], 9);
}

#[tokio::test]
async fn test_health_reports_store_status() {
    let app = create_test_app(default_seed());
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dependencies"]["memory"]["status"], "healthy");
}

#[tokio::test]
async fn test_responses_carry_trace_id() {
    let app = create_test_app(default_seed());
    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .uri("/health")
            .header("x-trace-id", "trace-42")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.headers()["x-trace-id"], "trace-42");
}
