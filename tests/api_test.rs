//! API tests: the full router over an in-memory SQLite database.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database as SeaDatabase};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use crud_api_starter::api::{create_router, AppState};
use crud_api_starter::config::Config;
use crud_api_starter::infra::{Database, Migrator};

async fn create_test_app() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let connection = SeaDatabase::connect(options)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&connection, None)
        .await
        .expect("Failed to run migrations");

    let config = Config::default();
    let database = Arc::new(Database::from_connection(connection));
    let state = AppState::from_config(database, None, &config);

    create_router(state, &config.allowed_origins)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn create(app: &Router, name: &str, emails: &[&str]) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/user",
        Some(json!({ "name": name, "emails": emails })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_create_user_returns_created_envelope() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/user",
        Some(json!({ "name": "Andrea Adam", "emails": ["a@example.com", "b@example.com"] })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], "0201");
    assert_eq!(body["description"], "CREATED");
    assert_eq!(body["data"]["name"], "Andrea Adam");
    assert_eq!(body["data"]["createdAt"], body["data"]["updatedAt"]);
    assert_eq!(body["data"]["emails"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["emails"][0]["userId"], body["data"]["id"]);
    assert!(body["data"].get("deletedAt").is_none());
}

#[tokio::test]
async fn test_create_user_with_duplicate_emails_persists_nothing() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/user",
        Some(json!({ "name": "Andrea Adam", "emails": ["a@example.com", "a@example.com"] })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "code": "0500", "description": "INTERNAL_SERVER_ERROR" }));

    let (_, list) = send(&app, Method::GET, "/api/v1/user", None).await;
    assert_eq!(list["data"]["total"], 0);
}

#[tokio::test]
async fn test_create_user_validation_errors_map_fields() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/user",
        Some(json!({ "name": "<script>", "emails": ["not-an-email"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "0400");
    assert_eq!(body["description"], "BAD_REQUEST");
    assert_eq!(
        body["data"],
        json!({
            "name": "the name contains unsafe characters",
            "emails": "must be a valid email address"
        })
    );

    let (status, body) = send(&app, Method::POST, "/api/v1/user", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["data"],
        json!({ "name": "cannot be blank", "emails": "cannot be blank" })
    );
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = create_test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/user")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["data"].is_string());
}

#[tokio::test]
async fn test_read_users_rejects_invalid_query() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/user?page=abc&orderBy=email&sortBy=up&disableCalculateTotal=maybe&id=42",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["data"],
        json!({
            "page": "must contain digits only",
            "orderBy": "must be a valid value",
            "sortBy": "must be a valid value",
            "disableCalculateTotal": "must be a valid value",
            "id": "must be a valid UUID"
        })
    );
}

#[tokio::test]
async fn test_read_users_paginates() {
    let app = create_test_app().await;
    create(&app, "Andrea Adam", &["a@example.com"]).await;
    create(&app, "Zelda Skyward", &["z@example.com"]).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/user?limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "0200");
    assert_eq!(body["description"], "SUCCESS");
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["nextPage"], true);
    assert_eq!(body["data"]["records"][0]["name"], "Andrea Adam");

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/user?page=2&limit=1&disableCalculateTotal=true",
        None,
    )
    .await;
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["records"][0]["name"], "Zelda Skyward");

    let (_, body) = send(&app, Method::GET, "/api/v1/user?search=Zel", None).await;
    assert_eq!(body["data"]["records"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["nextPage"], false);
}

#[tokio::test]
async fn test_read_users_with_out_of_range_page_is_empty() {
    let app = create_test_app().await;
    create(&app, "Andrea Adam", &["a@example.com"]).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/user?page=9223372036854775808",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert!(body["data"]["records"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["nextPage"], false);
}

#[tokio::test]
async fn test_update_user_replaces_emails() {
    let app = create_test_app().await;
    let user = create(&app, "Andrea Adam", &["a@example.com", "b@example.com"]).await;
    let id = user["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/user/{id}"),
        Some(json!({ "emails": ["c@example.com"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "code": "0200", "description": "SUCCESS" }));

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/user?id={id}"), None).await;
    let record = &body["data"]["records"][0];
    assert_eq!(record["name"], "Andrea Adam");
    assert_eq!(record["emails"].as_array().unwrap().len(), 1);
    assert_eq!(record["emails"][0]["email"], "c@example.com");
}

#[tokio::test]
async fn test_update_user_errors() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/user/not-a-uuid",
        Some(json!({ "name": "Zelda" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], json!({ "id": "must be a valid UUID" }));

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/user/7f5abfff-fae9-4c0d-8433-50f650583dac",
        Some(json!({ "name": "Zelda" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_delete_user_then_read_by_id_is_empty() {
    let app = create_test_app().await;
    let user = create(&app, "Andrea Adam", &["a@example.com"]).await;
    let id = user["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/user/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "SUCCESS");

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/user?id={id}"), None).await;
    assert!(body["data"]["records"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/user/{id}"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_routing_errors_use_envelope() {
    let app = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "code": "0404", "description": "NOT_FOUND" }));

    let (status, body) = send(&app, Method::PUT, "/api/v1/user", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "code": "0405", "description": "METHOD_NOT_ALLOWED" }));
}

#[tokio::test]
async fn test_health_and_response_headers() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["cache"]["status"], "disabled");
}
