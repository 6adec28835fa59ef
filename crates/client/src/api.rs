//! REST client for the bug-tracker backend.
//!
//! Every call is a single request with no retry. Authenticated calls send
//! the bearer token of the [`Session`] the client was built with; calling
//! one without a session fails with [`ApiError::NotAuthenticated`] before
//! anything goes on the wire.

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bugdesk_core::bug::BugStatus;
use bugdesk_core::forms::{NewBugForm, NewProjectForm, ProfileUpdate, SignupForm};
use bugdesk_core::normalize::{normalize_project, RawBug, RawProject};
use bugdesk_core::outcome::{Invalidation, MutationOutcome};
use bugdesk_core::project::ProjectRecord;
use bugdesk_core::roles::Role;
use bugdesk_core::session::Session;
use bugdesk_core::types::DbId;
use bugdesk_core::user::{UserProfile, UserSummary};

use crate::config::ClientConfig;
use crate::error::{extract_detail, ApiError};
use crate::paths;

/// Reported for a duplicate project title when the backend gives no reason.
pub const DUPLICATE_PROJECT_MESSAGE: &str = "Project with this title already exists";

/// Response of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// What happened to the developer assignment that follows bug creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentResult {
    /// No developers were selected.
    Skipped,
    Assigned,
    /// The bug exists but the assignment was rejected; not rolled back.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugCreated {
    /// `None` if the backend did not echo an id back.
    pub bug_id: Option<DbId>,
    pub assignment: AssignmentResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCreated {
    pub project: ProjectRecord,
    /// Members whose assignment request failed.
    pub failed_assignments: Vec<DbId>,
}

#[derive(Debug, Serialize)]
struct StatusQuery {
    status_update: BugStatus,
}

#[derive(Debug, Serialize)]
struct AssignUserQuery {
    user_id: DbId,
}

/// HTTP client for one backend.
#[derive(Debug, Clone)]
pub struct BugdeskApi {
    client: reqwest::Client,
    api_url: String,
    session: Option<Session>,
}

impl BugdeskApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config.api_base_url.clone())
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url,
            session: None,
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Result<&Session, ApiError> {
        self.session.as_ref().ok_or(ApiError::NotAuthenticated)
    }

    /// Drop the session (logout). Returns the one that was active.
    pub fn clear_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    // ---- auth ----

    /// `POST /auth/login` with a form-encoded body.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url(paths::LOGIN))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Log in, look up the user's role, and keep the resulting session.
    pub async fn sign_in(&mut self, username: &str, password: &str) -> Result<Session, ApiError> {
        let login = self.login(username, password).await?;
        let profile = self.fetch_profile(&login.access_token).await?;
        let role: Role = profile.role.parse()?;

        tracing::info!(user_id = profile.id, role = %role, "Signed in");

        let session = Session::new(login.access_token, role);
        self.session = Some(session.clone());
        Ok(session)
    }

    /// `POST /auth/signup`. Returns the created user as sent by the backend.
    pub async fn signup(&self, form: &SignupForm) -> Result<serde_json::Value, ApiError> {
        let payload = form.payload()?;
        let response = self
            .client
            .post(self.url(paths::SIGNUP))
            .json(&payload)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET /auth/me`.
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        let token = self.session()?.token.clone();
        self.fetch_profile(&token).await
    }

    /// `PATCH /auth/` with a single changed field.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<MutationOutcome<UserProfile>, ApiError> {
        let response = self
            .authed(reqwest::Method::PATCH, paths::PROFILE)?
            .json(&update.body())
            .send()
            .await?;

        let profile = Self::parse_response(response).await?;
        tracing::info!(field = %update.field(), "Profile updated");
        Ok(MutationOutcome::new(profile, Invalidation::Profile))
    }

    // ---- users ----

    /// `GET /qa/developers`.
    pub async fn list_developers(&self) -> Result<Vec<UserSummary>, ApiError> {
        let response = self.authed(reqwest::Method::GET, paths::DEVELOPERS)?.send().await?;
        let value: serde_json::Value = Self::parse_response(response).await?;
        Ok(decode_list(value, &["developers", "data"]))
    }

    /// `GET /auth/admin/users`.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        let response = self.authed(reqwest::Method::GET, paths::ADMIN_USERS)?.send().await?;
        let value: serde_json::Value = Self::parse_response(response).await?;
        Ok(decode_list(value, &[]))
    }

    // ---- projects ----

    /// Projects visible to the session's role. A non-list body yields an
    /// empty list.
    pub async fn list_projects(&self) -> Result<Vec<RawProject>, ApiError> {
        let path = paths::projects(self.session()?.role);
        let response = self.authed(reqwest::Method::GET, &path)?.send().await?;
        let value: serde_json::Value = Self::parse_response(response).await?;
        Ok(decode_list(value, &[]))
    }

    /// Create a project, then assign every selected member concurrently.
    ///
    /// Assignment failures are logged and reported in the outcome; the
    /// project itself is kept.
    pub async fn create_project(
        &self,
        form: &NewProjectForm,
    ) -> Result<MutationOutcome<ProjectCreated>, ApiError> {
        form.validate()?;

        let response = self
            .authed(reqwest::Method::POST, paths::CREATE_PROJECT)?
            .json(&form.payload())
            .send()
            .await?;

        let raw: RawProject = match Self::parse_response(response).await {
            Err(ApiError::Api {
                status: status @ (400 | 409),
                detail,
            }) => {
                return Err(ApiError::Api {
                    status,
                    detail: Some(detail.unwrap_or_else(|| DUPLICATE_PROJECT_MESSAGE.to_string())),
                });
            }
            other => other?,
        };
        let project = normalize_project(raw);

        let members = form.member_ids();
        let results = join_all(
            members
                .iter()
                .map(|user_id| self.assign_user_to_project(project.id, *user_id)),
        )
        .await;

        let mut failed_assignments = Vec::new();
        for (user_id, result) in members.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(project_id = project.id, user_id, error = %e, "Project member assignment failed");
                failed_assignments.push(*user_id);
            }
        }

        tracing::info!(project_id = project.id, title = %project.title, "Project created");
        Ok(MutationOutcome::new(
            ProjectCreated {
                project,
                failed_assignments,
            },
            Invalidation::Projects,
        ))
    }

    /// `POST /manager/projects/{id}/assign-user_new_endpoint?user_id=`.
    pub async fn assign_user_to_project(
        &self,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<(), ApiError> {
        let response = self
            .authed(reqwest::Method::POST, &paths::assign_project_user(project_id))?
            .query(&AssignUserQuery { user_id })
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- bugs ----

    /// Raw bug records for one project, or every bug visible to the user.
    /// The body must be a JSON array; its elements are decoded leniently.
    pub async fn list_bugs(&self, project_id: Option<DbId>) -> Result<Vec<RawBug>, ApiError> {
        let path = paths::bugs(self.session()?.role, project_id);
        let response = self.authed(reqwest::Method::GET, &path)?.send().await?;
        let items: Vec<serde_json::Value> = Self::parse_response(response).await?;
        Ok(items.into_iter().map(RawBug::from_json).collect())
    }

    /// File a bug in `project_id`, then assign the selected developers.
    ///
    /// A failed assignment does not fail the call: the bug already exists
    /// and is left in place.
    pub async fn create_bug(
        &self,
        project_id: DbId,
        form: &NewBugForm,
    ) -> Result<MutationOutcome<BugCreated>, ApiError> {
        form.validate()?;

        let response = self
            .authed(reqwest::Method::POST, &paths::create_bug(project_id))?
            .json(&form.payload(project_id))
            .send()
            .await?;

        let created: serde_json::Value = Self::parse_response(response).await?;
        let bug_id = created.get("id").and_then(|v| v.as_i64());

        tracing::info!(project_id, ?bug_id, "Bug created");

        let assignment = match bug_id {
            Some(id) if !form.developer_ids.is_empty() => {
                match self.assign_developers(id, &form.developer_ids).await {
                    Ok(()) => AssignmentResult::Assigned,
                    Err(e) => {
                        tracing::warn!(bug_id = id, error = %e, "Bug created, but assignments failed");
                        AssignmentResult::Failed(e.user_message())
                    }
                }
            }
            _ => AssignmentResult::Skipped,
        };

        Ok(MutationOutcome::new(
            BugCreated { bug_id, assignment },
            Invalidation::Bugs,
        ))
    }

    /// `POST /qa/bugs/{id}/assign-developers` with a JSON array of ids.
    pub async fn assign_developers(
        &self,
        bug_id: DbId,
        developer_ids: &[DbId],
    ) -> Result<(), ApiError> {
        let response = self
            .authed(reqwest::Method::POST, &paths::assign_developers(bug_id))?
            .json(developer_ids)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `PATCH /developer/bugs/{id}/status?status_update=`.
    pub async fn update_status(
        &self,
        bug_id: DbId,
        status: BugStatus,
    ) -> Result<MutationOutcome<()>, ApiError> {
        let response = self
            .authed(reqwest::Method::PATCH, &paths::bug_status(bug_id))?
            .query(&StatusQuery {
                status_update: status,
            })
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::info!(bug_id, status = %status, "Bug status updated");
        Ok(MutationOutcome::new((), Invalidation::Bugs))
    }

    /// `GET /bugs/{id}/assignees`.
    pub async fn bug_assignees(&self, bug_id: DbId) -> Result<Vec<UserSummary>, ApiError> {
        let response = self
            .authed(reqwest::Method::GET, &paths::bug_assignees(bug_id))?
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Start a request carrying the session's bearer token.
    fn authed(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let session = self.session()?;
        Ok(self
            .client
            .request(method, self.url(path))
            .bearer_auth(&session.token)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .get(self.url(paths::ME))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Ensure the response has a success status code. On failure the body
    /// is read for a human-readable reason.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Decode a list body that may be a bare array or an object wrapping the
/// array under one of `keys`. Anything else, and any element that does not
/// decode, is dropped.
fn decode_list<T: DeserializeOwned>(value: serde_json::Value, keys: &[&str]) -> Vec<T> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => keys
            .iter()
            .find_map(|k| match map.remove(*k) {
                Some(serde_json::Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable list entry");
                None
            }
        })
        .collect()
}
