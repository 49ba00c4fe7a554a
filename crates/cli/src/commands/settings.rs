//! Settings feed check.

use std::path::Path;

use muva_core::Settings;

use super::{FeedError, read_feed};

/// Check a settings file.
///
/// Any JSON document is accepted; missing or non-string fields simply leave
/// the feature disabled, which is reported rather than treated as an error.
///
/// # Errors
///
/// Returns an error if the file can't be read or is not valid JSON.
pub async fn check(path: &Path) -> Result<Settings, FeedError> {
    tracing::info!("Checking settings: {}", path.display());

    let document = read_feed(path).await?;
    if !document.is_object() {
        tracing::warn!("  Settings should be a JSON object; every feature is disabled");
    }
    let settings = Settings::from_json(&document);

    match settings.booking_url() {
        Some(url) => tracing::info!("  Booking: enabled ({url})"),
        None => tracing::warn!("  Booking: no calendlyUrl, dialog shows a placeholder"),
    }
    match settings.form_id() {
        Some(id) => tracing::info!("  Contact form: enabled (form {id})"),
        None => tracing::warn!("  Contact form: no formspreeId, form is disabled"),
    }

    Ok(settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn test_empty_object_disables_everything() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let settings = check(file.path()).await.unwrap();
        assert!(settings.booking_url().is_none());
        assert!(settings.form_id().is_none());
    }

    #[tokio::test]
    async fn test_reports_configured_features() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"calendlyUrl": "https://calendly.com/muva/30min", "formspreeId": "xyzabc"}}"#
        )
        .unwrap();

        let settings = check(file.path()).await.unwrap();
        assert_eq!(settings.booking_url(), Some("https://calendly.com/muva/30min"));
        assert_eq!(settings.form_id(), Some("xyzabc"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            check(file.path()).await,
            Err(FeedError::Json { .. })
        ));
    }
}
