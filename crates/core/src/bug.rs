//! Bug record display model.
//!
//! [`BugRecord`] is what every screen works with after raw backend
//! payloads pass through [`crate::normalize`]. Status and kind are closed
//! enums so downstream code never sees an out-of-range value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Initial status for a newly filed bug.
pub const STATUS_NEW: &str = "new";
/// A developer has picked the bug up.
pub const STATUS_STARTED: &str = "started";
/// The underlying issue has been fixed.
pub const STATUS_RESOLVED: &str = "resolved";

/// All valid bug statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_NEW, STATUS_STARTED, STATUS_RESOLVED];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BugStatus {
    #[default]
    New,
    Started,
    Resolved,
}

impl BugStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BugStatus::New => STATUS_NEW,
            BugStatus::Started => STATUS_STARTED,
            BugStatus::Resolved => STATUS_RESOLVED,
        }
    }

    /// Lenient parse used at the normalization boundary: case and
    /// surrounding whitespace are ignored, anything unknown is `None`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            STATUS_NEW => Some(BugStatus::New),
            STATUS_STARTED => Some(BugStatus::Started),
            STATUS_RESOLVED => Some(BugStatus::Resolved),
            _ => None,
        }
    }

    /// Color hint used by list and grid renderers.
    pub fn color_hint(self) -> &'static str {
        match self {
            BugStatus::New => "red",
            BugStatus::Started => "blue",
            BugStatus::Resolved => "green",
        }
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BugStatus {
    type Err = CoreError;

    /// Strict parse for user input (e.g. a status update command).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid bug status '{}'. Must be one of: {:?}",
                s, VALID_STATUSES
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

pub const KIND_BUG: &str = "bug";
pub const KIND_FEATURE: &str = "feature";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BugKind {
    #[default]
    Bug,
    Feature,
}

impl BugKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BugKind::Bug => KIND_BUG,
            BugKind::Feature => KIND_FEATURE,
        }
    }

    /// `"feature"` (any case) is a feature request; everything else,
    /// including a missing value, is a bug.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case(KIND_FEATURE) => BugKind::Feature,
            _ => BugKind::Bug,
        }
    }
}

impl fmt::Display for BugKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BugKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            KIND_BUG => Ok(BugKind::Bug),
            KIND_FEATURE => Ok(BugKind::Feature),
            other => Err(CoreError::Validation(format!(
                "Invalid bug type '{other}'. Must be 'bug' or 'feature'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub name: String,
}

/// A tracked issue or feature request, as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugRecord {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: BugStatus,
    pub kind: BugKind,
    pub deadline: Option<String>,
    /// Data URI or remote URL of the attached screenshot.
    pub screenshot_url: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
    /// Always present; empty when the backend sent no assignments.
    pub assignees: Vec<Assignee>,
}

impl BugRecord {
    /// Text fed to the risk scorer: title and description joined by a
    /// single space, with a missing description treated as empty.
    pub fn risk_text(&self) -> String {
        format!("{} {}", self.title, self.description.as_deref().unwrap_or(""))
    }

    pub fn has_screenshot(&self) -> bool {
        self.screenshot_url.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
