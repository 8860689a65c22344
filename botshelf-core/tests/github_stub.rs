//! Exercises the GitHub fetchers against an in-process stub of the REST API.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use botshelf_core::error::GithubError;
use botshelf_core::github::{GithubClient, GithubConfig, HISTORY_LIMIT, RATE_LIMIT_MESSAGE};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct StubState {
    auth_headers: Arc<Mutex<Vec<String>>>,
}

fn commit_json(i: usize) -> Value {
    json!({
        "sha": format!("{i:040x}"),
        "html_url": format!("https://github.com/owner/bot/commit/{i}"),
        "commit": {
            "message": format!("change number {i}\n\ndetails"),
            "author": { "name": "dev", "date": format!("2024-01-{:02}T12:00:00Z", 20 - i) }
        }
    })
}

async fn list_commits(
    State(state): State<StubState>,
    Path((owner, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.auth_headers.lock().unwrap().push(auth.to_owned());
    }
    match (owner.as_str(), name.as_str()) {
        ("limited", _) => (StatusCode::FORBIDDEN, Json(json!({"message": "API rate limit exceeded"}))),
        ("broken", _) => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "oops"}))),
        ("object", _) => (StatusCode::OK, Json(json!({"message": "not a list"}))),
        _ => (StatusCode::OK, Json(Value::Array((0..7).map(commit_json).collect()))),
    }
}

async fn commit_detail(
    Path((owner, _name, sha)): Path<(String, String, String)>,
) -> impl IntoResponse {
    if owner == "broken" {
        return (StatusCode::BAD_GATEWAY, Json(json!({"message": "upstream"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "sha": sha,
            "files": [
                {"filename": "src/lib.rs", "additions": 3, "deletions": 1,
                 "patch": "@@ -1,2 +1,4 @@\n-old\n+new\n+more\n+lines\n ctx"},
                {"filename": "assets/logo.png", "additions": 0, "deletions": 0}
            ]
        })),
    )
}

async fn spawn_stub() -> (String, StubState) {
    let state = StubState::default();
    let app = Router::new()
        .route("/repos/:owner/:name/commits", get(list_commits))
        .route("/repos/:owner/:name/commits/:sha", get(commit_detail))
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

fn client(base_url: &str, token: Option<&str>) -> GithubClient {
    let config = GithubConfig::new(base_url).with_token(token.map(str::to_owned));
    GithubClient::new(config).unwrap()
}

#[tokio::test]
async fn keeps_first_five_commits_in_api_order() {
    let (base, _) = spawn_stub().await;
    let commits = client(&base, None).list_commits("owner/bot").await.unwrap();

    assert_eq!(commits.len(), HISTORY_LIMIT);
    let first = &commits[0];
    assert_eq!(first.sha.as_deref(), Some(format!("{:040x}", 0).as_str()));
    assert_eq!(first.headline(), "change number 0");
    assert_eq!(first.date.to_rfc3339(), "2024-01-20T12:00:00+00:00");
    assert_eq!(commits[4].headline(), "change number 4");
}

#[tokio::test]
async fn sends_bearer_token_when_configured() {
    let (base, state) = spawn_stub().await;
    client(&base, Some("s3cret")).list_commits("owner/bot").await.unwrap();
    client(&base, None).list_commits("owner/bot").await.unwrap();

    let seen = state.auth_headers.lock().unwrap().clone();
    assert_eq!(seen, vec!["Bearer s3cret".to_owned()]);
}

#[tokio::test]
async fn forbidden_history_becomes_one_rate_limit_entry() {
    let (base, _) = spawn_stub().await;
    let gh = client(&base, None);

    assert!(matches!(gh.list_commits("limited/bot").await, Err(GithubError::RateLimited)));

    let log = gh.changelog("limited/bot").await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].message, RATE_LIMIT_MESSAGE);
    assert!(log[0].is_placeholder());
}

#[tokio::test]
async fn other_history_failures_also_become_a_placeholder() {
    let (base, _) = spawn_stub().await;
    let gh = client(&base, None);

    let log = gh.changelog("broken/bot").await;
    assert_eq!(log.len(), 1);
    assert!(log[0].message.contains("500"), "got {}", log[0].message);

    let log = gh.changelog("object/bot").await;
    assert_eq!(log.len(), 1);
    assert!(log[0].is_placeholder());
}

#[tokio::test]
async fn unreachable_api_becomes_a_placeholder() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let log = client(&format!("http://{addr}"), None).changelog("owner/bot").await;
    assert_eq!(log.len(), 1);
    assert!(log[0].is_placeholder());
}

#[tokio::test]
async fn commit_files_carry_patches() {
    let (base, _) = spawn_stub().await;
    let files = client(&base, None).commit_files("owner/bot", "abc123").await.unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].filename, "src/lib.rs");
    assert_eq!((files[0].additions, files[0].deletions), (3, 1));
    assert!(files[0].patch.starts_with("@@ -1,2 +1,4 @@"));
    assert!(files[1].patch.is_empty());
}

#[tokio::test]
async fn commit_detail_failure_is_an_error() {
    let (base, _) = spawn_stub().await;
    let err = client(&base, None).commit_files("broken/bot", "abc123").await.unwrap_err();
    assert!(matches!(err, GithubError::Status { status } if status.as_u16() == 502));
}
