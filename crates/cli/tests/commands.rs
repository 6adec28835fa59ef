//! End-to-end command runs against a small in-process backend.

use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use bugdesk_cli::args::PageArgs;
use bugdesk_cli::commands::apply_paging;
use bugdesk_cli::store::SessionStore;
use bugdesk_cli::{run, Cli};
use bugdesk_core::error::CoreError;
use bugdesk_core::listing::ListView;
use bugdesk_core::project::ProjectRecord;
use bugdesk_core::roles::Role;
use bugdesk_core::session::Session;
use clap::Parser;
use serde_json::{json, Value};

async fn start_backend() -> String {
    let app = Router::new()
        .route("/auth/login", post(|| async { Json(json!({"access_token": "tok-9", "token_type": "bearer"})) }))
        .route(
            "/auth/me",
            get(|| async { Json(json!({"id": 9, "name": "Dana", "email": "dana@example.com", "role": "developer"})) }),
        )
        .route(
            "/bugs",
            get(|| async {
                Json(json!([
                    {"id": 7, "title": "Crash", "status": null, "screenshot_url": null},
                    {"id": 8, "title": "Works great now", "status": "resolved"}
                ]))
            }),
        )
        .route("/bugs/7/assignees", get(|| async { Json(json!([{"id": 9, "name": "Dana"}])) }))
        .route("/developer/bugs/7/status", patch(|| async { Json(Value::Null) }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Backend whose bug list is down.
async fn start_failing_backend() -> String {
    let app = Router::new().route(
        "/bugs",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Database unavailable"})),
            )
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn cli(base_url: &str, session_file: &Path, args: &[&str]) -> Cli {
    let session_file = session_file.to_string_lossy();
    let mut argv = vec!["bugdesk", "--api-url", base_url, "--session-file", session_file.as_ref()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn session_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    (dir, path)
}

#[tokio::test]
async fn login_then_logout() {
    let base_url = start_backend().await;
    let (_dir, path) = session_path();

    run(cli(&base_url, &path, &["login", "--email", "dana@example.com", "--password", "pw"]))
        .await
        .unwrap();
    let stored = SessionStore::new(&path).load().unwrap().unwrap();
    assert_eq!(stored, Session::new("tok-9", Role::Developer));

    run(cli(&base_url, &path, &["logout"])).await.unwrap();
    assert!(SessionStore::new(&path).load().unwrap().is_none());
}

#[tokio::test]
async fn commands_need_a_session() {
    let base_url = start_backend().await;
    let (_dir, path) = session_path();

    let err = run(cli(&base_url, &path, &["bugs", "list"])).await.unwrap_err();
    assert_matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Unauthorized(_)));
}

#[tokio::test]
async fn developers_cannot_file_bugs() {
    let base_url = start_backend().await;
    let (_dir, path) = session_path();
    SessionStore::new(&path).save(&Session::new("tok-9", Role::Developer)).unwrap();

    let err = run(cli(
        &base_url,
        &path,
        &["bugs", "create", "--project", "1", "--title", "t", "--description", "d", "--deadline", "2026-12-01"],
    ))
    .await
    .unwrap_err();
    assert_matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Forbidden(_)));
}

#[tokio::test]
async fn show_and_status_for_listed_bug() {
    let base_url = start_backend().await;
    let (_dir, path) = session_path();
    SessionStore::new(&path).save(&Session::new("tok-9", Role::Developer)).unwrap();

    run(cli(&base_url, &path, &["bugs", "list", "--search", "crash"])).await.unwrap();
    run(cli(&base_url, &path, &["bugs", "show", "7"])).await.unwrap();
    run(cli(&base_url, &path, &["bugs", "status", "7", "started"])).await.unwrap();

    let err = run(cli(&base_url, &path, &["bugs", "show", "99"])).await.unwrap_err();
    assert_matches!(
        err.downcast_ref::<CoreError>(),
        Some(CoreError::NotFound { entity: "bug", id: 99 })
    );
}

#[tokio::test]
async fn failed_bug_fetch_is_reported_instead_of_not_found() {
    let base_url = start_failing_backend().await;
    let (_dir, path) = session_path();
    SessionStore::new(&path).save(&Session::new("tok-9", Role::Developer)).unwrap();

    let detail_commands: [&[&str]; 3] = [
        &["bugs", "show", "7"],
        &["bugs", "status", "7", "started"],
        &["bugs", "ocr", "7"],
    ];
    for args in detail_commands {
        let err = run(cli(&base_url, &path, args)).await.unwrap_err();
        assert!(err.downcast_ref::<CoreError>().is_none(), "{args:?}: {err}");
        assert_eq!(err.to_string(), "Database unavailable");
    }

    // The list screen renders its failed state instead of erroring.
    run(cli(&base_url, &path, &["bugs", "list"])).await.unwrap();
}

#[tokio::test]
async fn ocr_without_screenshot_is_rejected() {
    let base_url = start_backend().await;
    let (_dir, path) = session_path();
    SessionStore::new(&path).save(&Session::new("tok-9", Role::Developer)).unwrap();

    let err = run(cli(&base_url, &path, &["bugs", "ocr", "7"])).await.unwrap_err();
    assert_matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_)));
}

#[test]
fn out_of_range_page_is_rejected() {
    let mut view: ListView<ProjectRecord> = ListView::default();
    view.set_items(
        (1..=3)
            .map(|id| ProjectRecord {
                id,
                title: format!("Project {id}"),
                description: String::new(),
            })
            .collect(),
    );
    let paging = PageArgs {
        search: String::new(),
        page: 2,
    };
    assert_matches!(apply_paging(&mut view, &paging), Err(CoreError::Validation(_)));
}

#[test]
fn page_size_must_be_numeric() {
    assert!(Cli::try_parse_from(["bugdesk", "bugs", "list", "--page-size", "many"]).is_err());
    assert!(Cli::try_parse_from(["bugdesk", "bugs", "status", "1", "closed"]).is_err());
}
