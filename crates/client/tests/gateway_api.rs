//! Integration tests for the backend gateway against an in-process fake.

mod common;

use assert_matches::assert_matches;
use axum::http::Method;

use bugdesk_client::api::{AssignmentResult, DUPLICATE_PROJECT_MESSAGE};
use bugdesk_client::error::{ApiError, GENERIC_FAILURE_MESSAGE};
use bugdesk_core::bug::{BugKind, BugStatus};
use bugdesk_core::forms::{NewBugForm, NewProjectForm, ProfileField, ProfileUpdate};
use bugdesk_core::normalize::normalize_bugs;
use bugdesk_core::outcome::Invalidation;
use bugdesk_core::roles::Role;

use common::FakeBackend;

fn bug_form(developer_ids: Vec<i64>) -> NewBugForm {
    NewBugForm {
        title: "Upload hangs".into(),
        description: "Spinner never stops".into(),
        deadline: "2026-12-01".into(),
        kind: BugKind::Bug,
        screenshot_url: None,
        developer_ids,
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_in_posts_form_then_reads_role() {
    let backend = FakeBackend::start().await;
    backend.route(
        Method::POST,
        "/auth/login",
        200,
        r#"{"access_token":"tok-1","token_type":"bearer"}"#,
    );
    backend.route(
        Method::GET,
        "/auth/me",
        200,
        r#"{"id":1,"name":"Quinn","email":"quinn@example.com","role":"qa","phone":"555"}"#,
    );

    let mut api = backend.api();
    let session = api.sign_in("quinn@example.com", "pw").await.unwrap();

    assert_eq!(session.role, Role::Qa);
    assert_eq!(session.token, "tok-1");
    assert!(api.session().is_ok());

    let requests = backend.requests();
    assert_eq!(requests[0].path, "/auth/login");
    assert_eq!(requests[0].body, "username=quinn%40example.com&password=pw");
    assert_eq!(requests[1].authorization.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn rejected_login_surfaces_backend_detail() {
    let backend = FakeBackend::start().await;
    backend.route(
        Method::POST,
        "/auth/login",
        401,
        r#"{"detail":"Incorrect username or password"}"#,
    );

    let mut api = backend.api();
    let err = api.sign_in("x@example.com", "bad").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "Incorrect username or password");
    assert!(api.session().is_err());
}

#[tokio::test]
async fn sign_in_with_unknown_role_fails() {
    let backend = FakeBackend::start().await;
    backend.route(Method::POST, "/auth/login", 200, r#"{"access_token":"t"}"#);
    backend.route(Method::GET, "/auth/me", 200, r#"{"id":1,"role":"admin"}"#);

    let err = backend.api().sign_in("a@example.com", "pw").await.unwrap_err();
    assert_matches!(err, ApiError::Core(_));
}

#[tokio::test]
async fn profile_update_sends_only_changed_field() {
    let backend = FakeBackend::start().await;
    backend.route(
        Method::PATCH,
        "/auth/",
        200,
        r#"{"id":1,"name":"Quinn","email":"q@example.com","role":"qa","phone":"777"}"#,
    );

    let update = ProfileUpdate::new(ProfileField::Phone, "777").unwrap();
    let outcome = backend.api_as(Role::Qa).update_profile(&update).await.unwrap();

    assert_eq!(outcome.value.phone.as_deref(), Some("777"));
    assert_eq!(outcome.invalidates, Invalidation::Profile);
    let body: serde_json::Value = serde_json::from_str(&backend.requests()[0].body).unwrap();
    assert_eq!(body, serde_json::json!({ "phone": "777" }));
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn developer_bug_list_uses_role_path_and_bearer() {
    let backend = FakeBackend::start().await;
    backend.route(
        Method::GET,
        "/developer/projects/3/bugs",
        200,
        r#"[{"id":7,"title":"Crash","status":null,"assignments":null},
            {"id":8,"title":"Slow","status":"started","assignments":[{"user":{"name":"Ada"}}]}]"#,
    );

    let raw = backend.api_as(Role::Developer).list_bugs(Some(3)).await.unwrap();
    let bugs = normalize_bugs(raw);

    assert_eq!(bugs.len(), 2);
    assert_eq!(bugs[0].status, BugStatus::New);
    assert!(bugs[0].assignees.is_empty());
    assert_eq!(bugs[1].assignees[0].name, "Ada");

    let request = &backend.requests()[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn one_mistyped_bug_does_not_fail_the_list() {
    let backend = FakeBackend::start().await;
    backend.route(
        Method::GET,
        "/bugs",
        200,
        r#"[{"id":1,"title":"Fine","status":"started"},
            {"id":null,"title":"Crash","status":5,"assignments":[{"user":"ravi"}]},
            {"id":3,"title":"Also fine"}]"#,
    );

    let raw = backend.api_as(Role::Qa).list_bugs(None).await.unwrap();
    let bugs = normalize_bugs(raw);

    assert_eq!(bugs.len(), 3);
    assert_eq!(bugs[1].id, 0);
    assert_eq!(bugs[1].title, "Crash");
    assert_eq!(bugs[1].status, BugStatus::New);
    assert_eq!(bugs[1].assignees[0].name, "Unknown");
    assert_eq!(bugs[2].id, 3);
}

#[tokio::test]
async fn malformed_bug_list_is_a_decode_error() {
    let backend = FakeBackend::start().await;
    backend.route(Method::GET, "/bugs", 200, "<html>oops</html>");

    let err = backend.api_as(Role::Manager).list_bugs(None).await.unwrap_err();
    assert_matches!(err, ApiError::Decode(_));
}

#[tokio::test]
async fn failed_bug_list_without_detail_uses_generic_message() {
    let backend = FakeBackend::start().await;
    backend.route(Method::GET, "/bugs", 500, "");

    let err = backend.api_as(Role::Qa).list_bugs(None).await.unwrap_err();
    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn project_list_by_role_tolerates_non_array() {
    let backend = FakeBackend::start().await;
    backend.route(
        Method::GET,
        "/manager/projectstodisplaythehisownprojects",
        200,
        r#"{"detail":"nothing here"}"#,
    );
    backend.route(
        Method::GET,
        "/qa/projectstodisplaythehisownprojects",
        200,
        r#"[{"id":1,"title":"Billing","description":"Invoices"}]"#,
    );

    assert!(backend.api_as(Role::Manager).list_projects().await.unwrap().is_empty());
    assert_eq!(backend.api_as(Role::Qa).list_projects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn developers_list_unwraps_envelope() {
    let backend = FakeBackend::start().await;
    backend.route(
        Method::GET,
        "/qa/developers",
        200,
        r#"{"developers":[{"id":4,"name":"Ada"},{"id":5,"name":"Lin"}]}"#,
    );

    let devs = backend.api_as(Role::Qa).list_developers().await.unwrap();
    assert_eq!(devs.iter().map(|d| d.id).collect::<Vec<_>>(), vec![4, 5]);
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bug_survives_failed_developer_assignment() {
    let backend = FakeBackend::start().await;
    backend.route(Method::POST, "/qa/projects/2/bugs", 200, r#"{"id":11}"#);
    backend.route(Method::POST, "/qa/bugs/11/assign-developers", 500, "{}");

    let outcome = backend
        .api_as(Role::Qa)
        .create_bug(2, &bug_form(vec![4, 5]))
        .await
        .unwrap();

    assert_eq!(outcome.value.bug_id, Some(11));
    assert_matches!(outcome.value.assignment, AssignmentResult::Failed(_));
    assert_eq!(outcome.invalidates, Invalidation::Bugs);

    let requests = backend.requests();
    let created: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(created["status"], "new");
    assert_eq!(created["project_id"], 2);
    assert_eq!(requests[1].body, "[4,5]");
}

#[tokio::test]
async fn bug_without_developers_skips_assignment() {
    let backend = FakeBackend::start().await;
    backend.route(Method::POST, "/qa/projects/2/bugs", 201, r#"{"id":12}"#);

    let outcome = backend
        .api_as(Role::Qa)
        .create_bug(2, &bug_form(vec![]))
        .await
        .unwrap();

    assert_eq!(outcome.value.assignment, AssignmentResult::Skipped);
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn invalid_bug_form_sends_nothing() {
    let backend = FakeBackend::start().await;
    let form = NewBugForm {
        deadline: String::new(),
        ..bug_form(vec![])
    };

    let err = backend.api_as(Role::Qa).create_bug(2, &form).await.unwrap_err();
    assert_eq!(err.user_message(), "Please fill in Title, Description, and Deadline.");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn duplicate_project_title_gets_readable_message() {
    let backend = FakeBackend::start().await;
    backend.route(Method::POST, "/manager/projects", 409, "{}");

    let form = NewProjectForm {
        title: "Billing".into(),
        description: String::new(),
        qa_ids: vec![2],
        developer_ids: vec![3],
    };
    let err = backend.api_as(Role::Manager).create_project(&form).await.unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(err.user_message(), DUPLICATE_PROJECT_MESSAGE);
}

#[tokio::test]
async fn new_project_assigns_every_member() {
    let backend = FakeBackend::start().await;
    backend.route(Method::POST, "/manager/projects", 200, r#"{"id":20,"title":"Billing"}"#);
    backend.route(
        Method::POST,
        "/manager/projects/20/assign-user_new_endpoint",
        200,
        r#"{"ok":true}"#,
    );

    let form = NewProjectForm {
        title: "Billing".into(),
        description: "Invoices".into(),
        qa_ids: vec![2],
        developer_ids: vec![3, 4],
    };
    let outcome = backend.api_as(Role::Manager).create_project(&form).await.unwrap();

    assert_eq!(outcome.value.project.id, 20);
    assert!(outcome.value.failed_assignments.is_empty());
    assert_eq!(outcome.invalidates, Invalidation::Projects);

    let mut queries: Vec<String> = backend
        .requests()
        .into_iter()
        .filter(|r| r.path.ends_with("assign-user_new_endpoint"))
        .filter_map(|r| r.query)
        .collect();
    queries.sort();
    assert_eq!(queries, vec!["user_id=2", "user_id=3", "user_id=4"]);
}

#[tokio::test]
async fn status_update_sends_query_parameter() {
    let backend = FakeBackend::start().await;
    backend.route(Method::PATCH, "/developer/bugs/5/status", 200, "{}");

    let outcome = backend
        .api_as(Role::Developer)
        .update_status(5, BugStatus::Resolved)
        .await
        .unwrap();

    assert_eq!(outcome.invalidates, Invalidation::Bugs);
    assert_eq!(backend.requests()[0].query.as_deref(), Some("status_update=resolved"));
}
