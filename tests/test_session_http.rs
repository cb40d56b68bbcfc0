mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use helpers::*;
use serde_json::{json, Value};
use session_service::application::services::SessionService;
use session_service::domain::entities::{
    CreateSessionRequest, Session, SessionFilter, UserSessionsList,
};
use session_service::domain::errors::{DomainError, DomainResult};
use session_service::domain::ports::session_repository::SessionRepository;
use session_service::infrastructure::http::middleware::AppState;
use session_service::infrastructure::http::router::build_router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Repository whose every call fails, optionally after a delay.
struct BrokenRepository {
    delay: Duration,
}

impl BrokenRepository {
    async fn fail<T>(&self) -> DomainResult<T> {
        tokio::time::sleep(self.delay).await;
        Err(DomainError::Persistence("connection refused".to_string()))
    }
}

#[async_trait::async_trait]
impl SessionRepository for BrokenRepository {
    async fn create_session(&self, _request: &CreateSessionRequest) -> DomainResult<Session> {
        self.fail().await
    }

    async fn get_session_by_id(&self, _id: &str) -> DomainResult<Session> {
        self.fail().await
    }

    async fn delete_session_by_id(&self, _id: &str) -> DomainResult<()> {
        self.fail().await
    }

    async fn delete_session_by_user_id(&self, _user_id: &str) -> DomainResult<u64> {
        self.fail().await
    }

    async fn get_user_sessions(
        &self,
        _user_id: &str,
        _filter: SessionFilter,
    ) -> DomainResult<UserSessionsList> {
        self.fail().await
    }
}

fn router_with(repo: Arc<dyn SessionRepository>, timeout: Duration) -> Router {
    build_router(AppState {
        session_service: Arc::new(SessionService::new(repo, timeout)),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn create_body(id: &str, user_id: &str) -> Value {
    json!({
        "id": id,
        "ip_address": "10.0.0.1",
        "user_id": user_id,
        "fcm_token": "t1",
        "platform_name": "iPhone 14",
        "platform_type": "mobile"
    })
}

#[tokio::test]
async fn test_session_lifecycle_over_http() {
    let test_db = setup_test_db().await;
    let app = router_with(Arc::new(test_db.db().clone()), Duration::from_secs(5));

    let (status, created) = send(&app, post_json("/api/sessions", create_body("s1", "u1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "s1");
    assert!(created["order"].as_i64().unwrap() >= 1);
    assert!(!created["login_at"].as_str().unwrap().is_empty());
    assert!(!created["created_at"].as_str().unwrap().is_empty());
    assert!(created["deleted_at"].is_null());

    let (status, fetched) = send(&app, get("/api/sessions/s1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, ack) = send(&app, delete("/api/sessions/s1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack, json!({}));

    let (_, fetched) = send(&app, get("/api/sessions/s1")).await;
    assert!(fetched["deleted_at"].is_string());

    let (status, active) = send(&app, get("/api/users/u1/sessions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["count"], 0);
    assert_eq!(active["user_sessions"], json!([]));

    let (_, all) = send(&app, get("/api/users/u1/sessions?is_active=true")).await;
    assert_eq!(all["count"], 1);
    assert_eq!(all["user_sessions"][0]["id"], "s1");

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_bulk_delete_and_existence_over_http() {
    let test_db = setup_test_db().await;
    let app = router_with(Arc::new(test_db.db().clone()), Duration::from_secs(5));

    let (_, exists) = send(&app, get("/api/users/u1/sessions/exists")).await;
    assert_eq!(exists, json!({ "is_exists": false }));

    send(&app, post_json("/api/sessions", create_body("a", "u1"))).await;
    send(&app, post_json("/api/sessions", create_body("b", "u1"))).await;
    send(&app, post_json("/api/sessions", create_body("c", "u2"))).await;

    let (_, exists) = send(&app, get("/api/users/u1/sessions/exists")).await;
    assert_eq!(exists, json!({ "is_exists": true }));

    let (status, ack) = send(&app, delete("/api/users/u1/sessions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack, json!({}));

    let (_, exists) = send(&app, get("/api/users/u1/sessions/exists")).await;
    assert_eq!(exists, json!({ "is_exists": false }));
    let (_, exists) = send(&app, get("/api/users/u1/sessions/exists?is_active=true")).await;
    assert_eq!(exists, json!({ "is_exists": true }));

    let (_, other) = send(&app, get("/api/users/u2/sessions")).await;
    assert_eq!(other["count"], 1);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let test_db = setup_test_db().await;
    let app = router_with(Arc::new(test_db.db().clone()), Duration::from_secs(5));

    let (status, body) = send(&app, get("/api/sessions/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let test_db = setup_test_db().await;
    let app = router_with(Arc::new(test_db.db().clone()), Duration::from_secs(5));

    let (status, _) = send(&app, post_json("/api/sessions", create_body("s1", "u1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, post_json("/api/sessions", create_body("s1", "u1"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_blank_session_id_is_bad_request() {
    let test_db = setup_test_db().await;
    let app = router_with(Arc::new(test_db.db().clone()), Duration::from_secs(5));

    let (status, _) = send(&app, post_json("/api/sessions", create_body("", "u1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send(&app, get("/api/users/u1/sessions?is_active=true")).await;
    assert_eq!(list["count"], 0);

    teardown_test_db(test_db).await;
}

#[tokio::test]
async fn test_store_failure_is_not_masked_as_absence() {
    let app = router_with(
        Arc::new(BrokenRepository {
            delay: Duration::ZERO,
        }),
        Duration::from_secs(5),
    );

    let (status, body) = send(&app, get("/api/users/u1/sessions/exists")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.get("is_exists").is_none());

    let (status, _) = send(&app, get("/api/sessions/s1")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = send(&app, get("/api/users/u1/sessions")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_service_timeout_is_gateway_timeout() {
    let app = router_with(
        Arc::new(BrokenRepository {
            delay: Duration::from_millis(500),
        }),
        Duration::from_millis(20),
    );

    let (status, _) = send(&app, get("/api/sessions/s1")).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn test_caller_timeout_header_shortens_deadline() {
    let app = router_with(
        Arc::new(BrokenRepository {
            delay: Duration::from_millis(500),
        }),
        Duration::from_secs(30),
    );

    let request = Request::builder()
        .uri("/api/users/u1/sessions/exists")
        .header("x-request-id", "req-123")
        .header("x-request-timeout-ms", "20")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

    let request = Request::builder()
        .uri("/api/sessions/s1")
        .header("x-request-timeout-ms", "soon")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = router_with(
        Arc::new(BrokenRepository {
            delay: Duration::ZERO,
        }),
        Duration::from_secs(1),
    );

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
