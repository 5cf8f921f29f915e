use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tower::ServiceExt;

use blogify::application::repos::{PostsRepo, PostsWriteRepo, RepoError};
use blogify::application::suggestions::{CompletionClient, CompletionError};
use blogify::domain::entities::PostRecord;
use blogify::domain::posts::{NewPost, PostPatch};
use blogify::config::CorsSettings;
use blogify::infra::completion::GroqKeyDiagnostics;
use blogify::infra::db::SqliteRepositories;
use blogify::infra::http::{ApiState, build_router};

const FRONTEND: &str = "http://localhost:5173";

/// Completion client that replays a canned reply and records every prompt.
struct StubCompletion {
    reply: Result<String, u16>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubCompletion {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(status) => Err(CompletionError::Status {
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

async fn build_app(completion: Arc<StubCompletion>, api_key: Option<&str>) -> Router {
    let pool = SqliteRepositories::connect_in_memory()
        .await
        .expect("in-memory pool");
    SqliteRepositories::run_migrations(&pool)
        .await
        .expect("migrations");

    let repositories = Arc::new(SqliteRepositories::new(pool));
    let state = ApiState::new(
        repositories.clone(),
        repositories,
        completion,
        GroqKeyDiagnostics::inspect(api_key),
    );
    router_for(state)
}

fn router_for(state: ApiState) -> Router {
    let cors = CorsSettings {
        frontend_url: FRONTEND.to_string(),
        explicit: true,
    };
    build_router(state, &cors).expect("router")
}

/// Store whose every call fails the way a dropped database connection does.
struct UnavailableStore;

#[async_trait]
impl PostsRepo for UnavailableStore {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        Err(RepoError::Timeout)
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<PostRecord>, RepoError> {
        Err(RepoError::Timeout)
    }
}

#[async_trait]
impl PostsWriteRepo for UnavailableStore {
    async fn create_post(&self, _post: NewPost) -> Result<PostRecord, RepoError> {
        Err(RepoError::from_persistence("disk I/O error"))
    }

    async fn update_post(&self, _id: i64, _patch: PostPatch) -> Result<PostRecord, RepoError> {
        Err(RepoError::Timeout)
    }

    async fn delete_post(&self, _id: i64) -> Result<(), RepoError> {
        Err(RepoError::Timeout)
    }
}

async fn app() -> Router {
    build_app(StubCompletion::replying("{}"), None).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(app: &Router, title: &str, content: &str, author: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/blogs",
        Some(json!({ "title": title, "content": content, "author": author })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["postId"].as_i64().expect("postId")
}

fn timestamp(value: &Value) -> OffsetDateTime {
    OffsetDateTime::parse(value.as_str().expect("timestamp string"), &Rfc3339)
        .expect("rfc3339 timestamp")
}

// ============ Posts ============

#[tokio::test]
async fn created_post_reads_back_with_same_fields() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({ "title": "Hello", "content": "World", "author": "Amy" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Blog post created successfully");
    assert_eq!(body["postId"], 1);

    let (status, post) = send(&app, Method::GET, "/api/blogs/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["id"], 1);
    assert_eq!(post["title"], "Hello");
    assert_eq!(post["content"], "World");
    assert_eq!(post["author"], "Amy");
    assert_eq!(timestamp(&post["created_at"]), timestamp(&post["updated_at"]));
}

#[tokio::test]
async fn create_with_missing_or_empty_field_is_rejected_and_not_stored() {
    let app = app().await;

    let payloads = [
        json!({ "content": "World", "author": "Amy" }),
        json!({ "title": "Hello", "author": "Amy" }),
        json!({ "title": "Hello", "content": "World" }),
        json!({ "title": "", "content": "World", "author": "Amy" }),
        json!({ "title": "Hello", "content": "", "author": "Amy" }),
        json!({ "title": "Hello", "content": "World", "author": null }),
        json!({}),
    ];

    for payload in payloads {
        let (status, body) = send(&app, Method::POST, "/api/blogs", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload} accepted");
        assert_eq!(body["error"], "Title, content, and author are required");
    }

    let (status, list) = send(&app, Method::GET, "/api/blogs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn partial_update_keeps_other_fields_and_bumps_updated_at() {
    let app = app().await;
    let id = create(&app, "Hello", "World", "Amy").await;
    let (_, before) = send(&app, Method::GET, &format!("/api/blogs/{id}"), None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/blogs/{id}"),
        Some(json!({ "title": "Hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blog post updated successfully");

    let (_, after) = send(&app, Method::GET, &format!("/api/blogs/{id}"), None).await;
    assert_eq!(after["title"], "Hi");
    assert_eq!(after["content"], "World");
    assert_eq!(after["author"], "Amy");
    assert_eq!(after["created_at"], before["created_at"]);
    assert!(timestamp(&after["updated_at"]) > timestamp(&before["updated_at"]));
    assert!(timestamp(&after["updated_at"]) >= timestamp(&after["created_at"]));
}

#[tokio::test]
async fn whitespace_only_fields_are_stored_verbatim() {
    let app = app().await;
    let id = create(&app, "   ", "World", "Amy").await;

    let (status, post) = send(&app, Method::GET, &format!("/api/blogs/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["title"], "   ");
}

#[tokio::test]
async fn empty_update_fields_leave_values_untouched() {
    let app = app().await;
    let id = create(&app, "Hello", "World", "Amy").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/blogs/{id}"),
        Some(json!({ "title": "", "content": "  ", "author": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, post) = send(&app, Method::GET, &format!("/api/blogs/{id}"), None).await;
    assert_eq!(post["title"], "Hello");
    assert_eq!(post["content"], "  ");
    assert_eq!(post["author"], "Amy");
}

#[tokio::test]
async fn repeated_updates_keep_increasing_updated_at() {
    let app = app().await;
    let id = create(&app, "Hello", "World", "Amy").await;

    let mut previous = {
        let (_, post) = send(&app, Method::GET, &format!("/api/blogs/{id}"), None).await;
        timestamp(&post["updated_at"])
    };
    for round in 0..5 {
        send(
            &app,
            Method::PUT,
            &format!("/api/blogs/{id}"),
            Some(json!({ "content": format!("revision {round}") })),
        )
        .await;
        let (_, post) = send(&app, Method::GET, &format!("/api/blogs/{id}"), None).await;
        let current = timestamp(&post["updated_at"]);
        assert!(current > previous);
        previous = current;
    }
}

#[tokio::test]
async fn updating_unknown_post_is_not_found() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/blogs/99",
        Some(json!({ "title": "Hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Blog post not found");
}

#[tokio::test]
async fn deleting_twice_succeeds_then_reports_not_found() {
    let app = app().await;
    let id = create(&app, "Hello", "World", "Amy").await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/blogs/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blog post deleted successfully");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/blogs/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Blog post not found");

    let (status, _) = send(&app, Method::GET, &format!("/api/blogs/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
    let app = app().await;
    let first = create(&app, "One", "Body", "Amy").await;
    send(&app, Method::DELETE, &format!("/api/blogs/{first}"), None).await;

    let second = create(&app, "Two", "Body", "Amy").await;
    assert!(second > first);
}

#[tokio::test]
async fn listing_returns_every_post_newest_first() {
    let app = app().await;
    let ids = [
        create(&app, "First", "Body one", "Amy").await,
        create(&app, "Second", "Body two", "Bo").await,
        create(&app, "Third", "Body three", "Cy").await,
    ];

    let (status, list) = send(&app, Method::GET, "/api/blogs", None).await;
    assert_eq!(status, StatusCode::OK);
    let posts = list.as_array().expect("array");
    assert_eq!(posts.len(), ids.len());

    let listed: Vec<i64> = posts
        .iter()
        .map(|post| post["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);

    for pair in posts.windows(2) {
        assert!(timestamp(&pair[0]["created_at"]) >= timestamp(&pair[1]["created_at"]));
    }
}

#[tokio::test]
async fn unknown_and_non_numeric_ids_are_not_found() {
    let app = app().await;

    for uri in ["/api/blogs/42", "/api/blogs/abc", "/api/blogs/1.5"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "Blog post not found");
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request_with_json_body() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/blogs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .expect("request should build");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json error body");
    assert_eq!(body["error"], "Invalid request body");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn storage_failures_are_server_errors() {
    let store = Arc::new(UnavailableStore);
    let app = router_for(ApiState::new(
        store.clone(),
        store,
        StubCompletion::replying("{}"),
        GroqKeyDiagnostics::inspect(None),
    ));

    let (status, body) = send(&app, Method::GET, "/api/blogs", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch blogs");
    assert_eq!(body["details"], "database timeout");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({ "title": "Hello", "content": "World", "author": "Amy" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create blog");

    let (status, body) = send(&app, Method::DELETE, "/api/blogs/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to delete blog");
}

// ============ Suggestions ============

#[tokio::test]
async fn suggestions_without_title_or_content_never_reach_the_service() {
    let stub = StubCompletion::replying("{}");
    let app = build_app(stub.clone(), Some("gsk_test")).await;

    for payload in [json!({}), json!({ "title": "", "content": "" })] {
        let (status, body) = send(&app, Method::POST, "/api/ai-suggestions", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title or content is required");
    }
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn whitespace_draft_is_still_sent_for_suggestions() {
    let stub = StubCompletion::replying("{}");
    let app = build_app(stub.clone(), Some("gsk_test")).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/ai-suggestions",
        Some(json!({ "title": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn fenced_json_reply_becomes_suggestions() {
    let reply = "```json\n{\"suggestions\": [\"Related topic: borrowing\", \"Intro paragraph: Picture a library.\"]}\n```";
    let stub = StubCompletion::replying(reply);
    let app = build_app(stub.clone(), Some("gsk_test")).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/ai-suggestions",
        Some(json!({ "title": "Ownership in Rust" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "suggestions": ["Related topic: borrowing", "Intro paragraph: Picture a library."] })
    );

    assert_eq!(stub.calls(), 1);
    let prompts = stub.prompts.lock().expect("prompts lock");
    assert!(prompts[0].contains("Title: \"Ownership in Rust\""));
    assert!(prompts[0].contains("Content: \"No content yet\""));
}

#[tokio::test]
async fn prose_reply_falls_back_to_long_lines() {
    let reply = "Sure!\nWrite about lifetimes next\nok\nExplain the borrow checker with diagrams\n";
    let app = build_app(StubCompletion::replying(reply), Some("gsk_test")).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/ai-suggestions",
        Some(json!({ "content": "A long enough draft about ownership." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "suggestions": [
            "Write about lifetimes next",
            "Explain the borrow checker with diagrams"
        ] })
    );
}

#[tokio::test]
async fn completion_failure_is_a_server_error() {
    let app = build_app(StubCompletion::failing(503), Some("gsk_test")).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/ai-suggestions",
        Some(json!({ "title": "Hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "AI suggestion failed");
    assert!(
        body["details"]
            .as_str()
            .expect("details")
            .contains("503")
    );
}

// ============ System ============

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK", "message": "Blog API running" }));
}

#[tokio::test]
async fn groq_diagnostics_describe_key_without_revealing_it() {
    let keyed = build_app(StubCompletion::replying("{}"), Some("gsk_0123456789")).await;

    let (status, body) = send(&keyed, Method::GET, "/api/debug-groq", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "isSet": true, "startsWithGsk": true, "length": 14, "isPlaceholder": false })
    );

    let unkeyed = app().await;
    let (_, body) = send(&unkeyed, Method::GET, "/api/debug-groq", None).await;
    assert_eq!(body["isSet"], false);
    assert_eq!(body["length"], 0);
}

#[tokio::test]
async fn client_routes_serve_the_app_shell() {
    let app = app().await;

    for uri in ["/", "/write", "/blog/3", "/edit/3"] {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"), "{uri}: {content_type}");
    }

    let request = Request::builder()
        .uri("/static/app.js")
        .body(Body::empty())
        .expect("request should build");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/static/missing.js")
        .body(Body::empty())
        .expect("request should build");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_api_routes_are_json_not_found() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/blogs")
        .header(header::ORIGIN, FRONTEND)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .expect("request should build");
    let response = app.clone().oneshot(request).await.expect("response");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some(FRONTEND)
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|value| value.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app().await;

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .expect("request should build");
    let response = app.clone().oneshot(request).await.expect("response");
    let generated = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .expect("generated request id");
    assert_eq!(generated.len(), 36);

    let request = Request::builder()
        .uri("/api/blogs/404")
        .header("x-request-id", "trace-abc_123")
        .body(Body::empty())
        .expect("request should build");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("trace-abc_123")
    );
}
