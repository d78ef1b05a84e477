use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bootstrap a tracker project inside the given temp directory.
fn init_project(dir: &TempDir) {
    tracker_core::io::ensure_dir(&tracker_core::paths::tracker_dir(dir.path())).unwrap();
    tracker_core::config::Config::new("test-project")
        .save(dir.path())
        .unwrap();
}

async fn send(app: axum::Router, req: axum::http::Request<axum::body::Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    send(app, req).await
}

/// Send a POST request with a JSON body via `oneshot`.
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, req).await
}

async fn create(dir: &TempDir) -> serde_json::Value {
    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, body) = post_json(app, "/api/requirements", json!({ "name": "Order Approvals" })).await;
    assert_eq!(status, StatusCode::OK);
    body
}

async fn act(dir: &TempDir, stage: &str, action: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let app = tracker_server::build_router(dir.path().to_path_buf());
    post_json(app, &format!("/api/screens/{stage}/actions"), action).await
}

// ---------------------------------------------------------------------------
// Session / landing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_before_create_is_400() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, body) = get(app, "/api/session").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no active requirement"));
}

#[tokio::test]
async fn create_starts_on_intake() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let body = create(&dir).await;
    assert!(body["requirement"]["id"].as_str().unwrap().starts_with("REQ-"));
    assert_eq!(body["active"], "intake-brd");
    assert_eq!(body["nav"].as_array().unwrap().len(), 8);
    assert_eq!(body["gates"][0]["open"], false);

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, session) = get(app, "/api/session").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["requirement"]["name"], "Order Approvals");
}

#[tokio::test]
async fn create_without_name_is_422() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, body) = post_json(app, "/api/requirements", json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Please provide a requirement name");
}

#[tokio::test]
async fn open_rejects_malformed_id() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(app, "/api/requirements/open", json!({ "id": "nope" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, body) =
        post_json(app, "/api/requirements/open", json!({ "id": "REQ-ABC123" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requirement"]["name"], "O2C Enhancement");
}

#[tokio::test]
async fn dashboard_search_filters() {
    let dir = TempDir::new().unwrap();
    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, all) = get(app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (_, none) = get(app, "/api/dashboard?q=zzzz-no-match").await;
    assert!(!all["approvals"].as_array().unwrap().is_empty());
    assert!(none["approvals"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn config_is_read_only_view() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, body) = get(app, "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["project"]["name"], "test-project");
    assert_eq!(body["config"]["execution"]["pass_threshold"], 95);
    assert!(body["warnings"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn navigate_previews_only() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create(&dir).await;

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, nav) = post_json(app, "/api/nav/training", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let training = &nav[6];
    assert_eq!(training["id"], "training");
    assert_eq!(training["highlighted"], true);
    assert_eq!(training["current"], false);
    assert_eq!(nav[0]["current"], true);

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(app, "/api/nav/nowhere", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Screen actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blocked_advance_is_422_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create(&dir).await;

    act(&dir, "intake-brd", json!({ "action": "upload", "kind": "transcript" })).await;
    act(&dir, "intake-brd", json!({ "action": "generate_brd" })).await;
    let before = std::fs::read_to_string(tracker_core::paths::session_path(dir.path())).unwrap();

    let (status, body) = act(&dir, "intake-brd", json!({ "action": "approve_brd" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Complete Business Review before approval");

    let after = std::fs::read_to_string(tracker_core::paths::session_path(dir.path())).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn action_on_wrong_stage_path_is_400() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create(&dir).await;
    let (status, body) = act(&dir, "design", json!({ "action": "generate_brd" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("generate_brd"));
}

#[tokio::test]
async fn unknown_entity_is_404() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create(&dir).await;
    let (status, _) = act(&dir, "build-gates", json!({ "action": "run_check", "id": 9 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn approve_brd_moves_to_design() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create(&dir).await;

    for action in [
        json!({ "action": "upload", "kind": "notes" }),
        json!({ "action": "generate_brd" }),
        json!({ "action": "set_review", "review": "business", "checked": true }),
    ] {
        let (status, _) = act(&dir, "intake-brd", action).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = act(&dir, "intake-brd", json!({ "action": "approve_brd" })).await;
    assert_eq!(status, StatusCode::OK);
    let t = &body["outcome"]["transition"];
    assert_eq!(t["from"], "intake-brd");
    assert_eq!(t["from_status"], "approved");
    assert_eq!(t["to"], "design");
    assert_eq!(t["to_status"], "in_review");
    assert_eq!(body["session"]["active"], "design");

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, screen) = get(app, "/api/screens/design").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(screen["status"], "in_review");
    assert_eq!(screen["gate"]["action"], "Approve UI Prototype");
    assert_eq!(screen["gate"]["open"], true);
}

#[tokio::test]
async fn stakeholders_add_and_remove() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create(&dir).await;

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let (status, added) = post_json(
        app,
        "/api/stakeholders",
        json!({
            "name": "Dana",
            "functions": ["Business Owner"],
            "team": "Business",
            "department": "SAP",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = added["id"].as_str().unwrap().to_string();

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let req = axum::http::Request::builder()
        .method("DELETE")
        .uri(format!("/api/stakeholders/{id}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, removed) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["name"], "Dana");

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let req = axum::http::Request::builder()
        .method("DELETE")
        .uri(format!("/api/stakeholders/{id}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, _) = send(app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn events_stream_reports_applied_action() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create(&dir).await;

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let req = axum::http::Request::builder()
        .uri("/api/events")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
    let mut body = response.into_body();

    let (status, _) = post_json(
        app,
        "/api/screens/intake-brd/actions",
        json!({ "action": "generate_brd" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The file watcher may also report the write; wait for the action event.
    let text = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        loop {
            let frame = body.frame().await.unwrap().unwrap();
            if let Ok(data) = frame.into_data() {
                let text = String::from_utf8_lossy(&data).into_owned();
                if text.contains("\"kind\":\"action\"") {
                    return text;
                }
            }
        }
    })
    .await
    .unwrap();
    assert!(text.starts_with("event: update\n"));
    assert!(text.contains(r#"data: {"kind":"action","stage":"intake-brd","action":"generate_brd"}"#));
}

#[tokio::test]
async fn rejected_action_emits_no_event() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create(&dir).await;

    let app = tracker_server::build_router(dir.path().to_path_buf());
    let req = axum::http::Request::builder()
        .uri("/api/events")
        .body(axum::body::Body::empty())
        .unwrap();
    let mut body = app.clone().oneshot(req).await.unwrap().into_body();

    let (status, _) = post_json(
        app,
        "/api/screens/intake-brd/actions",
        json!({ "action": "approve_brd" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let next = tokio::time::timeout(std::time::Duration::from_millis(300), body.frame()).await;
    assert!(next.is_err(), "no event expected after a rejected action");
}
