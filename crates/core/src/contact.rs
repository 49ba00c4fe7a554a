//! Contact form state machine.
//!
//! ```text
//!        begin_submit           complete(Ok)
//! idle ───────────────▶ submitting ─────────▶ success
//!   ▲                        │
//!   │                        └──complete(Err)──▶ error
//!   └──────────── edit (from success/error) ───────┘
//! ```
//!
//! `begin_submit` stays put when submission is disabled (no endpoint id),
//! when a request is already in flight, when the honeypot is filled, or when
//! a field is invalid. Only the last of those is shown to the visitor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Email, EmailError};

/// The submitted form fields.
///
/// `_gotcha` is the hidden honeypot input; humans never fill it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "_gotcha")]
    pub gotcha: String,
}

impl ContactForm {
    /// Check the visible fields and return a normalized copy.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: blank name, malformed email or blank
    /// message.
    pub fn validate(&self) -> Result<Self, ContactValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ContactValidationError::MissingName);
        }
        let email = Email::parse(&self.email)?;
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ContactValidationError::MissingMessage);
        }
        Ok(Self {
            name: name.to_owned(),
            email: email.into(),
            message: message.to_owned(),
            gotcha: self.gotcha.clone(),
        })
    }

    /// Whether the honeypot was filled in.
    #[must_use]
    pub fn is_spam(&self) -> bool {
        !self.gotcha.is_empty()
    }
}

/// A visible-field problem that keeps the form idle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("Please tell us your name.")]
    MissingName,
    #[error("Please enter a valid email address.")]
    InvalidEmail(#[from] EmailError),
    #[error("Please include a message.")]
    MissingMessage,
}

/// Where the contact form is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl ContactStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Success and error are terminal until the next edit.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// A form field that can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Message,
    Honeypot,
}

/// A submission ready to be forwarded to the form endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub form_id: String,
    pub payload: ContactForm,
}

/// What `begin_submit` decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// No endpoint id is configured.
    Disabled,
    /// A submission is already outstanding.
    InFlight,
    /// Honeypot filled: drop silently.
    Dropped,
    /// A visible field is invalid.
    Invalid(ContactValidationError),
    /// Forward this submission; the machine is now `submitting`.
    Send(ContactSubmission),
}

/// Owns the contact form fields and status.
#[derive(Debug, Clone, Default)]
pub struct ContactSubmitter {
    form_id: Option<String>,
    form: ContactForm,
    status: ContactStatus,
}

impl ContactSubmitter {
    /// Create a submitter for `form_id`; an empty id disables submission.
    #[must_use]
    pub fn new(form_id: &str) -> Self {
        let form_id = form_id.trim();
        Self {
            form_id: (!form_id.is_empty()).then(|| form_id.to_owned()),
            ..Self::default()
        }
    }

    /// Create a submitter already holding `form` (a posted request).
    #[must_use]
    pub fn with_form(form_id: &str, form: ContactForm) -> Self {
        Self {
            form,
            ..Self::new(form_id)
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.form_id.is_some()
    }

    #[must_use]
    pub const fn status(&self) -> ContactStatus {
        self.status
    }

    #[must_use]
    pub const fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Update one field. Editing after success or error returns to idle.
    pub fn edit(&mut self, field: ContactField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ContactField::Name => self.form.name = value,
            ContactField::Email => self.form.email = value,
            ContactField::Message => self.form.message = value,
            ContactField::Honeypot => self.form.gotcha = value,
        }
        if self.status.is_terminal() {
            self.status = ContactStatus::Idle;
        }
    }

    /// Try to start a submission.
    ///
    /// Only [`SubmitDecision::Send`] changes the status (to `submitting`).
    pub fn begin_submit(&mut self) -> SubmitDecision {
        let Some(form_id) = self.form_id.clone() else {
            return SubmitDecision::Disabled;
        };
        if self.status == ContactStatus::Submitting {
            return SubmitDecision::InFlight;
        }
        if self.form.is_spam() {
            return SubmitDecision::Dropped;
        }
        let payload = match self.form.validate() {
            Ok(payload) => payload,
            Err(err) => return SubmitDecision::Invalid(err),
        };

        self.status = ContactStatus::Submitting;
        SubmitDecision::Send(ContactSubmission { form_id, payload })
    }

    /// Record the outcome of the outstanding submission.
    ///
    /// Success clears the visible fields; failure keeps them for a retry.
    /// Ignored unless a submission is in flight.
    pub fn complete(&mut self, delivered: bool) {
        if self.status != ContactStatus::Submitting {
            return;
        }
        if delivered {
            self.form.name.clear();
            self.form.email.clear();
            self.form.message.clear();
            self.status = ContactStatus::Success;
        } else {
            self.status = ContactStatus::Error;
        }
    }
}
