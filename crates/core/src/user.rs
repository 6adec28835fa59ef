//! User profile and user-list models.

use serde::{Deserialize, Serialize};

use crate::roles::{ROLE_DEVELOPER, ROLE_QA};
use crate::types::DbId;

/// The signed-in user, as returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: DbId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// An entry in the developer, assignee, or admin user lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: DbId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Two-letter avatar initials; `"??"` for an empty name.
pub fn initials(name: &str) -> String {
    if name.is_empty() {
        return "??".to_string();
    }
    name.chars().take(2).collect::<String>().to_uppercase()
}

/// Split an admin user list into the QA and developer pickers used by the
/// project form. Users with any other role are dropped.
pub fn split_by_role(users: Vec<UserSummary>) -> (Vec<UserSummary>, Vec<UserSummary>) {
    let mut qa = Vec::new();
    let mut developers = Vec::new();
    for user in users {
        match user.role.as_deref() {
            Some(ROLE_QA) => qa.push(user),
            Some(ROLE_DEVELOPER) => developers.push(user),
            _ => {}
        }
    }
    (qa, developers)
}
