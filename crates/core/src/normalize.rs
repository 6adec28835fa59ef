//! Normalization boundary between backend payloads and application state.
//!
//! Every raw record the gateway returns passes through here exactly once.
//! Missing or null fields get defaults field by field; nothing is ever
//! rejected.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::bug::{Assignee, BugKind, BugRecord, BugStatus};
use crate::project::{ProjectRecord, NO_DESCRIPTION, UNTITLED_PROJECT};
use crate::types::DbId;

/// Name shown for an assignment whose user the backend did not include.
pub const UNKNOWN_ASSIGNEE: &str = "Unknown";

// ---------------------------------------------------------------------------
// Raw shapes
// ---------------------------------------------------------------------------

/// Bug record as the backend sends it. Every field is optional, and a
/// field of the wrong JSON type reads as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBug {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: DbId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub screenshot_url: Option<String>,
    /// Either a user id or a user name depending on the endpoint.
    #[serde(default)]
    pub created_by: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_assignments")]
    pub assignments: Option<Vec<RawAssignment>>,
}

impl RawBug {
    /// Decode one element of a bug list. Anything that is not an object
    /// becomes an all-default record rather than failing the batch.
    pub fn from_json(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Bug record is not an object; using defaults");
            RawBug::default()
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAssignment {
    #[serde(default, deserialize_with = "lenient_user")]
    pub user: Option<RawUserRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUserRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProject {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: DbId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Integer ids, also accepted as numeric strings. Anything else is `0`.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DbId, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

fn lenient_user<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RawUserRef>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        user @ Value::Object(_) => serde_json::from_value(user).ok(),
        _ => None,
    })
}

/// Each entry stays in the list, so a malformed one still counts as an
/// (unknown) assignee.
fn lenient_assignments<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<RawAssignment>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Map one raw bug into the display model.
pub fn normalize_bug(raw: RawBug) -> BugRecord {
    let status = raw
        .status
        .as_deref()
        .and_then(BugStatus::parse_lenient)
        .unwrap_or_default();

    let assignees = raw
        .assignments
        .unwrap_or_default()
        .into_iter()
        .map(|a| Assignee {
            name: a
                .user
                .and_then(|u| u.name)
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_ASSIGNEE.to_string()),
        })
        .collect();

    BugRecord {
        id: raw.id,
        title: raw.title.unwrap_or_default(),
        kind: BugKind::from_raw(raw.kind.as_deref()),
        description: non_empty(raw.description),
        status,
        deadline: non_empty(raw.deadline),
        screenshot_url: non_empty(raw.screenshot_url),
        created_by: raw.created_by.and_then(value_to_label),
        created_at: non_empty(raw.created_at),
        assignees,
    }
}

/// Normalize a whole batch, preserving gateway order.
pub fn normalize_bugs(raw: Vec<RawBug>) -> Vec<BugRecord> {
    raw.into_iter().map(normalize_bug).collect()
}

pub fn normalize_project(raw: RawProject) -> ProjectRecord {
    ProjectRecord {
        id: raw.id,
        title: non_empty(raw.title).unwrap_or_else(|| UNTITLED_PROJECT.to_string()),
        description: non_empty(raw.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
    }
}

pub fn normalize_projects(raw: Vec<RawProject>) -> Vec<ProjectRecord> {
    raw.into_iter().map(normalize_project).collect()
}

/// The create form submits `""` for "no screenshot"; treat empty strings
/// as absent so nothing downstream mistakes them for a value.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn value_to_label(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
