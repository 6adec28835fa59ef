//! Project display model.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Title shown for a project the backend returned without one.
pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// Description shown for a project the backend returned without one.
pub const NO_DESCRIPTION: &str = "No description provided.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: DbId,
    pub title: String,
    pub description: String,
}
