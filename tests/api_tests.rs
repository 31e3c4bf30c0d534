/// HTTP boundary tests driving the router directly
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use client_onboarding::handlers::AppState;
use client_onboarding::pipeline::OnboardingPipeline;
use client_onboarding::routes::{build_router, MAX_BODY_BYTES};
use client_onboarding::scoring_client::ScoringClient;
use client_onboarding::store::InMemoryClientStore;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn app_with_score(score: f64) -> (Router, MockServer) {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "score": score })))
        .mount(&mock_server)
        .await;

    let scorer = ScoringClient::new(
        format!("{}/predict", mock_server.uri()),
        Duration::from_millis(300),
    )
    .unwrap();
    let pipeline = OnboardingPipeline::new(InMemoryClientStore::new(), scorer);
    let router = build_router(Arc::new(AppState::new(pipeline)), None).unwrap();

    (router, mock_server)
}

fn post_client(body: &str, query: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v1/clients{}", query))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _server) = app_with_score(0.9).await;
    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_onboard_returns_created_record() {
    let (app, _server) = app_with_score(0.9).await;

    let response = app
        .oneshot(post_client(
            r#"{"name": "Sara", "age": 30, "income": 50, "loans": 1}"#,
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["name"], "Sara");
    assert_eq!(body["score"], 0.9);
    assert_eq!(body["offer"]["tier"], "premium");
    assert!(body["offer"]["message"].as_str().unwrap().contains("Sara"));
    assert!(body["id"].is_string());
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_onboard_validation_error() {
    let (app, _server) = app_with_score(0.9).await;

    let response = app
        .clone()
        .oneshot(post_client(r#"{"name": "Sara", "age": 30}"#, ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].as_str().unwrap().contains("income"));

    let listing = app.oneshot(get("/api/v1/clients")).await.unwrap();
    assert_eq!(json_body(listing).await, json!([]));
}

#[tokio::test]
async fn test_onboard_malformed_json_is_validation_error() {
    let (app, _server) = app_with_score(0.9).await;

    let response = app.oneshot(post_client("{not json", "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["kind"], "validation");
}

#[tokio::test]
async fn test_onboard_oversized_body_keeps_413() {
    let (app, _server) = app_with_score(0.9).await;

    let padding = "x".repeat(MAX_BODY_BYTES + 1);
    let body = json!({ "name": padding, "age": 30, "income": 50, "loans": 1 }).to_string();
    let response = app.oneshot(post_client(&body, "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_onboard_bad_query_is_structured_validation_error() {
    let (app, _server) = app_with_score(0.9).await;

    let response = app
        .oneshot(post_client(
            r#"{"name": "Sara", "age": 30, "income": 50, "loans": 1}"#,
            "?lang=en&lang=fr",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_onboard_unknown_locale_rejected() {
    let (app, _server) = app_with_score(0.9).await;

    let response = app
        .oneshot(post_client(
            r#"{"name": "Sara", "age": 30, "income": 50, "loans": 1}"#,
            "?lang=xx",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_onboard_with_locale_query() {
    let (app, _server) = app_with_score(0.3).await;

    let response = app
        .oneshot(post_client(
            r#"{"name": "Sara", "age": 30, "income": 50, "loans": 1}"#,
            "?lang=fr",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["offer"]["tier"], "review");
    assert_eq!(body["offer"]["label"], "Examen manuel du dossier");
}

#[tokio::test]
async fn test_list_and_get_clients() {
    let (app, _server) = app_with_score(0.6).await;

    for name in ["Sara", "Omar"] {
        let body = json!({ "name": name, "age": 30, "income": 50, "loans": 1 }).to_string();
        let response = app.clone().oneshot(post_client(&body, "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let listing = json_body(app.clone().oneshot(get("/api/v1/clients")).await.unwrap()).await;
    let clients = listing.as_array().unwrap();
    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0]["name"], "Omar");
    assert_eq!(clients[1]["name"], "Sara");

    let id = clients[1]["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/clients/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Sara");

    let response = app
        .oneshot(get(&format!("/api/v1/clients/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
