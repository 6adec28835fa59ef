//! Form validation and request payloads.
//!
//! Each form is checked locally before anything is sent; the messages are
//! the ones shown to the user verbatim.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use validator::ValidateEmail;

use crate::bug::{BugKind, BugStatus};
use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Deadlines are calendar dates.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Bug
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct NewBugForm {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub kind: BugKind,
    /// Data URI of the compressed screenshot, if one was attached.
    pub screenshot_url: Option<String>,
    pub developer_ids: Vec<DbId>,
}

/// Body of `POST /qa/projects/{id}/bugs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BugPayload {
    pub title: String,
    pub description: String,
    pub project_id: DbId,
    #[serde(rename = "type")]
    pub kind: BugKind,
    pub status: BugStatus,
    pub deadline: String,
    /// Empty string when no screenshot is attached.
    pub screenshot_url: String,
}

impl NewBugForm {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.is_empty() || self.description.is_empty() || self.deadline.is_empty() {
            return Err(CoreError::Validation(
                "Please fill in Title, Description, and Deadline.".into(),
            ));
        }
        validate_deadline(&self.deadline)
    }

    pub fn payload(&self, project_id: DbId) -> BugPayload {
        BugPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            project_id,
            kind: self.kind,
            status: BugStatus::New,
            deadline: self.deadline.clone(),
            screenshot_url: self.screenshot_url.clone().unwrap_or_default(),
        }
    }
}

pub fn validate_deadline(deadline: &str) -> Result<(), CoreError> {
    NaiveDate::parse_from_str(deadline, DEADLINE_FORMAT)
        .map(|_| ())
        .map_err(|_| {
            CoreError::Validation(format!(
                "Deadline '{deadline}' is not a valid date (expected YYYY-MM-DD)"
            ))
        })
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct NewProjectForm {
    pub title: String,
    pub description: String,
    pub qa_ids: Vec<DbId>,
    pub developer_ids: Vec<DbId>,
}

/// Body of `POST /manager/projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPayload {
    pub title: String,
    pub description: String,
}

impl NewProjectForm {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::Validation("Please enter a project name".into()));
        }
        if self.qa_ids.is_empty() {
            return Err(CoreError::Validation("Please select at least one QA".into()));
        }
        if self.developer_ids.is_empty() {
            return Err(CoreError::Validation(
                "Please select at least one Developer".into(),
            ));
        }
        Ok(())
    }

    pub fn payload(&self) -> ProjectPayload {
        ProjectPayload {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
        }
    }

    /// Everyone to assign once the project exists: QA first, then
    /// developers, without duplicates.
    pub fn member_ids(&self) -> Vec<DbId> {
        let mut ids = Vec::with_capacity(self.qa_ids.len() + self.developer_ids.len());
        for id in self.qa_ids.iter().chain(&self.developer_ids) {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupPayload {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl SignupForm {
    pub fn validate(&self) -> Result<Role, CoreError> {
        let role = self
            .role
            .ok_or_else(|| CoreError::Validation("Please select a role first".into()))?;
        if self.password != self.confirm_password {
            return Err(CoreError::Validation("Passwords do not match".into()));
        }
        if !self.email.validate_email() {
            return Err(CoreError::Validation(format!(
                "'{}' is not a valid e-mail address",
                self.email
            )));
        }
        Ok(role)
    }

    pub fn payload(&self) -> Result<SignupPayload, CoreError> {
        let role = self.validate()?;
        Ok(SignupPayload {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            role,
        })
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Password,
}

impl ProfileField {
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Email => "email",
            ProfileField::Phone => "phone",
            ProfileField::Password => "password",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(ProfileField::Name),
            "email" => Ok(ProfileField::Email),
            "phone" => Ok(ProfileField::Phone),
            "password" => Ok(ProfileField::Password),
            other => Err(CoreError::Validation(format!(
                "Unknown profile field '{other}'. Must be one of: name, email, phone, password"
            ))),
        }
    }
}

/// A single-field profile edit, sent as a partial `PATCH /auth/` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    field: ProfileField,
    value: String,
}

impl ProfileUpdate {
    pub fn new(field: ProfileField, value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        match field {
            ProfileField::Password if value.is_empty() => {
                return Err(CoreError::Validation("Password cannot be empty".into()));
            }
            ProfileField::Email if !value.validate_email() => {
                return Err(CoreError::Validation(format!(
                    "'{value}' is not a valid e-mail address"
                )));
            }
            _ => {}
        }
        Ok(Self { field, value })
    }

    pub fn field(&self) -> ProfileField {
        self.field
    }

    pub fn body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(
            self.field.as_str().to_string(),
            serde_json::Value::String(self.value.clone()),
        );
        serde_json::Value::Object(body)
    }

    /// e.g. "Phone updated successfully!"
    pub fn success_message(&self) -> String {
        let name = self.field.as_str();
        let mut chars = name.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("{capitalized} updated successfully!")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn bug_form() -> NewBugForm {
        NewBugForm {
            title: "Checkout button dead".into(),
            description: "Nothing happens on click".into(),
            deadline: "2026-11-30".into(),
            ..Default::default()
        }
    }

    #[test]
    fn bug_form_requires_title_description_deadline() {
        assert!(bug_form().validate().is_ok());
        for strip in 0..3 {
            let mut form = bug_form();
            match strip {
                0 => form.title.clear(),
                1 => form.description.clear(),
                _ => form.deadline.clear(),
            }
            let err = form.validate().unwrap_err();
            assert_eq!(
                err.to_string(),
                "Validation failed: Please fill in Title, Description, and Deadline."
            );
        }
    }

    #[test]
    fn bug_form_rejects_malformed_deadline() {
        let form = NewBugForm {
            deadline: "30/11/2026".into(),
            ..bug_form()
        };
        assert_matches!(form.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn bug_payload_serializes_wire_names() {
        let form = NewBugForm {
            kind: BugKind::Feature,
            ..bug_form()
        };
        let json = serde_json::to_value(form.payload(9)).unwrap();
        assert_eq!(json["type"], "feature");
        assert_eq!(json["status"], "new");
        assert_eq!(json["project_id"], 9);
        assert_eq!(json["screenshot_url"], "");
    }

    #[test]
    fn project_form_rules_in_order() {
        let mut form = NewProjectForm {
            title: "   ".into(),
            ..Default::default()
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Validation failed: Please enter a project name"
        );
        form.title = " Billing ".into();
        assert!(form.validate().unwrap_err().to_string().contains("QA"));
        form.qa_ids = vec![2];
        assert!(form.validate().unwrap_err().to_string().contains("Developer"));
        form.developer_ids = vec![3, 2];
        assert!(form.validate().is_ok());
        assert_eq!(form.payload().title, "Billing");
        assert_eq!(form.member_ids(), vec![2, 3]);
    }

    #[test]
    fn signup_requires_role_and_matching_passwords() {
        let mut form = SignupForm {
            name: "Mia".into(),
            phone: "555".into(),
            email: "mia@example.com".into(),
            password: "hunter22".into(),
            confirm_password: "hunter2".into(),
            role: None,
        };
        assert!(form.validate().unwrap_err().to_string().contains("role"));
        form.role = Some(Role::Developer);
        assert!(form.validate().unwrap_err().to_string().contains("do not match"));
        form.confirm_password = "hunter22".into();
        let payload = form.payload().unwrap();
        assert_eq!(payload.role, Role::Developer);
    }

    #[test]
    fn signup_rejects_bad_email() {
        let form = SignupForm {
            email: "not-an-email".into(),
            role: Some(Role::Qa),
            ..Default::default()
        };
        assert_matches!(form.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn profile_update_body_has_single_field() {
        let update = ProfileUpdate::new(ProfileField::Phone, "0123").unwrap();
        assert_eq!(update.body(), serde_json::json!({ "phone": "0123" }));
        assert_eq!(update.success_message(), "Phone updated successfully!");
    }

    #[test]
    fn empty_password_rejected() {
        assert_matches!(
            ProfileUpdate::new(ProfileField::Password, ""),
            Err(CoreError::Validation(msg)) if msg == "Password cannot be empty"
        );
    }

    #[test]
    fn profile_field_parse() {
        assert_eq!("Email".parse::<ProfileField>().unwrap(), ProfileField::Email);
        assert!("avatar".parse::<ProfileField>().is_err());
    }
}
