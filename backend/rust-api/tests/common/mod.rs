#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use fitquiz_api::{
    config::Config,
    create_router,
    middlewares::auth::{JwtClaims, JwtService},
    models::question::{
        Category, CategoryKind, Gender, QuestionRecord, QuestionVariant, SeedData,
    },
    services::AppState,
    store::{GameStore, InMemoryStore},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

pub fn create_test_app(seed: SeedData) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = Arc::new(InMemoryStore::with_seed(seed));
    let config = Config::in_memory(TEST_JWT_SECRET);
    let app_state = Arc::new(AppState::with_store(config, store.clone()));

    TestApp {
        router: create_router(app_state),
        store,
    }
}

pub fn category(id: &str, kind: CategoryKind) -> Category {
    Category {
        id: id.to_string(),
        name: id.to_string(),
        kind,
        is_active: true,
        show_on_homepage: true,
    }
}

pub fn question(id: &str, category_id: &str, gender: Gender, colors: &[&str]) -> QuestionRecord {
    QuestionRecord {
        id: id.to_string(),
        name: format!("Fit {}", id),
        variants: colors
            .iter()
            .enumerate()
            .map(|(i, color)| QuestionVariant {
                image_url: format!("https://cdn.test/{}/{}.jpg", id, color),
                tag: color.to_string(),
                is_primary: i == 0,
            })
            .collect(),
        image_url: Some(format!("https://cdn.test/{}.jpg", id)),
        explanation: Some(format!("How to recognise {}", id)),
        category_id: category_id.to_string(),
        gender,
        fit_category: None,
        is_active: true,
    }
}

/// jeans: three single-image records. shirts: four records with colours.
/// tiny: two records. all: the pseudo-category.
pub fn default_seed() -> SeedData {
    SeedData {
        categories: vec![
            category("jeans", CategoryKind::Regular),
            category("shirts", CategoryKind::Regular),
            category("tiny", CategoryKind::Regular),
            category("all", CategoryKind::AllCategories),
        ],
        questions: vec![
            question("j-slim", "jeans", Gender::Male, &[]),
            question("j-regular", "jeans", Gender::Male, &[]),
            question("j-loose", "jeans", Gender::Male, &[]),
            question("s-oxford", "shirts", Gender::Female, &["white", "blue"]),
            question("s-linen", "shirts", Gender::Female, &["beige"]),
            question("s-flannel", "shirts", Gender::Female, &["red", "green"]),
            question("s-denim", "shirts", Gender::Female, &["indigo"]),
            question("t-one", "tiny", Gender::Male, &[]),
            question("t-two", "tiny", Gender::Male, &[]),
        ],
    }
}

pub fn token_for(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        name: None,
        exp: (now + 3600) as usize,
        iat: now as usize,
    };
    tokio_test::assert_ok!(JwtService::new(TEST_JWT_SECRET).generate_token(&claims))
}

pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    user_id: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("authorization", format!("Bearer {}", token_for(user_id)));
    }
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    let response = app
        .router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

/// Starts a session and returns its id, panicking with the body on failure.
pub async fn start_session(app: &TestApp, user_id: &str, category_id: &str) -> (String, Value) {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/sessions",
        Some(user_id),
        Some(serde_json::json!({ "category_id": category_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "start failed: {}", body);
    let id = body["session"]["id"].as_str().unwrap().to_string();
    (id, body)
}

/// Server-side answer for the pending question.
pub async fn correct_id(app: &TestApp, session_id: &str) -> String {
    app.store
        .get_session(session_id)
        .await
        .unwrap()
        .unwrap()
        .current_question
        .expect("session has a pending question")
        .correct_id
}

pub async fn wrong_id(app: &TestApp, session_id: &str) -> String {
    let current = app
        .store
        .get_session(session_id)
        .await
        .unwrap()
        .unwrap()
        .current_question
        .expect("session has a pending question");
    current
        .options
        .into_iter()
        .find(|o| o.id != current.correct_id)
        .expect("a wrong option")
        .id
}

pub async fn answer(
    app: &TestApp,
    user_id: &str,
    session_id: &str,
    selected_id: Option<&str>,
) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/api/v1/sessions/{}/answers", session_id),
        Some(user_id),
        Some(serde_json::json!({ "selected_id": selected_id, "response_time_ms": 2500 })),
    )
    .await
}
