//! Form payloads and validation.
//!
//! Submissions arrive as `application/x-www-form-urlencoded`. Optional
//! selects post an empty string for "no choice", which is deserialized to
//! `None`. Validation failures re-render the form with messages; they are
//! never surfaced as error responses.

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::models::Group;

/// Create/edit post form: exactly two fields, `text` and `group`.
///
/// `group` is kept as the raw select value so a tampered submission never
/// fails inside the deserializer; `group_choice` converts it and reports
/// bad values as ordinary validation messages.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Post text is required"))]
    pub text: String,
    #[serde(default)]
    pub group: String,
}

impl PostForm {
    /// Copy with surrounding whitespace stripped, the shape that gets
    /// validated and persisted.
    pub fn normalized(&self) -> PostForm {
        PostForm {
            text: self.text.trim().to_string(),
            group: self.group.trim().to_string(),
        }
    }

    /// Parsed group choice. An empty select means "no group"; anything that
    /// is not a group id gets the same message an unknown group id would.
    pub fn group_choice(&self) -> Result<Option<i64>, String> {
        let raw = self.group.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<i64>()
            .map(Some)
            .map_err(|_| "selected group does not exist".to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Where to go after login; carried through from the `?next=` parameter.
    #[serde(default)]
    pub next: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl SignupForm {
    pub fn normalized(&self) -> SignupForm {
        SignupForm {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Flatten validation errors into the messages the templates print.
pub fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("Invalid value for {field}")),
            }
        }
    }
    messages
}

/// Context rendered into the post form template.
#[derive(Debug, Clone)]
pub struct PostFormContext {
    pub text: String,
    pub group: Option<i64>,
    pub groups: Vec<Group>,
    pub errors: Vec<String>,
}

impl PostFormContext {
    pub fn empty(groups: Vec<Group>) -> Self {
        Self {
            text: String::new(),
            group: None,
            groups,
            errors: Vec::new(),
        }
    }

    pub fn from_form(form: &PostForm, groups: Vec<Group>) -> Self {
        Self {
            text: form.text.clone(),
            group: form.group_choice().ok().flatten(),
            groups,
            errors: Vec::new(),
        }
    }

    /// True when `id` is the currently selected group. Takes a reference
    /// because the template loop hands out borrowed group ids.
    pub fn is_selected(&self, id: &i64) -> bool {
        self.group.as_ref() == Some(id)
    }
}

/// Context rendered into the login/signup templates.
#[derive(Debug, Clone, Default)]
pub struct AuthFormContext {
    pub username: String,
    pub errors: Vec<String>,
}
