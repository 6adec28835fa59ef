//! Backend endpoint paths.
//!
//! List endpoints are routed by role; the builders here are the only
//! place that knows the mapping.

use bugdesk_core::roles::Role;
use bugdesk_core::types::DbId;

pub const LOGIN: &str = "/auth/login";
pub const ME: &str = "/auth/me";
pub const PROFILE: &str = "/auth/";
pub const SIGNUP: &str = "/auth/signup";
pub const ADMIN_USERS: &str = "/auth/admin/users";
pub const ALL_BUGS: &str = "/bugs";
pub const CREATE_PROJECT: &str = "/manager/projects";
pub const DEVELOPERS: &str = "/qa/developers";

/// Projects visible to `role`.
pub fn projects(role: Role) -> String {
    match role {
        Role::Manager | Role::Qa => format!("/{role}/projectstodisplaythehisownprojects"),
        Role::Developer => "/developer/projects".to_string(),
    }
}

/// Bugs of one project as seen by `role`, or every visible bug.
pub fn bugs(role: Role, project_id: Option<DbId>) -> String {
    match project_id {
        Some(id) => format!("/{role}/projects/{id}/bugs"),
        None => ALL_BUGS.to_string(),
    }
}

pub fn assign_project_user(project_id: DbId) -> String {
    format!("/manager/projects/{project_id}/assign-user_new_endpoint")
}

pub fn create_bug(project_id: DbId) -> String {
    format!("/qa/projects/{project_id}/bugs")
}

pub fn assign_developers(bug_id: DbId) -> String {
    format!("/qa/bugs/{bug_id}/assign-developers")
}

pub fn bug_status(bug_id: DbId) -> String {
    format!("/developer/bugs/{bug_id}/status")
}

pub fn bug_assignees(bug_id: DbId) -> String {
    format!("/bugs/{bug_id}/assignees")
}
