//! Dashboard roles.
//!
//! The backend routes most list endpoints by role, so the role string is
//! part of every request path the client builds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_QA: &str = "qa";
pub const ROLE_DEVELOPER: &str = "developer";

/// All roles the dashboard knows how to route.
pub const VALID_ROLES: &[&str] = &[ROLE_MANAGER, ROLE_QA, ROLE_DEVELOPER];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Qa,
    Developer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => ROLE_MANAGER,
            Role::Qa => ROLE_QA,
            Role::Developer => ROLE_DEVELOPER,
        }
    }

    /// Only managers may create projects.
    pub fn can_create_projects(self) -> bool {
        self == Role::Manager
    }

    /// Only QA may file bugs.
    pub fn can_create_bugs(self) -> bool {
        self == Role::Qa
    }

    /// Only developers may move a bug through its status lifecycle.
    pub fn can_update_status(self) -> bool {
        self == Role::Developer
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_MANAGER => Ok(Role::Manager),
            ROLE_QA => Ok(Role::Qa),
            ROLE_DEVELOPER => Ok(Role::Developer),
            other => Err(CoreError::Validation(format!(
                "Unknown role '{}'. Must be one of: {:?}",
                other, VALID_ROLES
            ))),
        }
    }
}
