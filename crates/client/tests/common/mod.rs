//! In-process fake backend for gateway integration tests.
//!
//! Canned responses are keyed by method and path; every request is
//! recorded so tests can assert on what actually went over the wire.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use bugdesk_client::api::BugdeskApi;
use bugdesk_client::config::ClientConfig;
use bugdesk_core::roles::Role;
use bugdesk_core::session::Session;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Clone, Default)]
struct Shared {
    routes: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    log: Arc<Mutex<Vec<Recorded>>>,
}

pub struct FakeBackend {
    shared: Shared,
    pub base_url: String,
}

impl FakeBackend {
    /// Bind to an ephemeral port and start serving in the background.
    pub async fn start() -> Self {
        let shared = Shared::default();
        let app = Router::new().fallback(handle).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            shared,
            base_url: format!("http://{addr}"),
        }
    }

    /// Respond to `method path` with `status` and a raw body.
    pub fn route(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.shared
            .routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.into()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.log.lock().unwrap().clone()
    }

    pub fn api(&self) -> BugdeskApi {
        BugdeskApi::new(&ClientConfig::new(self.base_url.clone()))
    }

    pub fn api_as(&self, role: Role) -> BugdeskApi {
        self.api().with_session(Session::new("test-token", role))
    }
}

async fn handle(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    shared.log.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let canned = shared
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), uri.path().to_string()))
        .cloned();

    match canned {
        Some((status, body)) => Response::builder()
            .status(StatusCode::from_u16(status).unwrap())
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => (StatusCode::NOT_FOUND, r#"{"detail":"Not Found"}"#).into_response(),
    }
}
