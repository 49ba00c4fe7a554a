//! Operator-editable runtime settings.

use serde::Serialize;
use serde_json::Value;

/// Booking link and form endpoint id, read from the settings feed.
///
/// A missing or non-string field resolves to the empty string, which
/// disables the corresponding feature. Reading settings never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub calendly_url: String,
    pub formspree_id: String,
}

impl Settings {
    /// Read settings from a feed document of any shape.
    #[must_use]
    pub fn from_json(document: &Value) -> Self {
        let field = |key: &str| {
            document
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_owned()
        };

        Self {
            calendly_url: field("calendlyUrl"),
            formspree_id: field("formspreeId"),
        }
    }

    /// The booking widget URL, if one is configured.
    #[must_use]
    pub fn booking_url(&self) -> Option<&str> {
        Some(self.calendly_url.as_str()).filter(|s| !s.is_empty())
    }

    /// The form endpoint id, if one is configured.
    #[must_use]
    pub fn form_id(&self) -> Option<&str> {
        Some(self.formspree_id.as_str()).filter(|s| !s.is_empty())
    }
}
