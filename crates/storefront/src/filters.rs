//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Path to the stylesheet for a build-time content hash.
///
/// An empty hash means the build could not fingerprint the file, so the
/// plain `main.css` is linked instead.
#[must_use]
pub fn stylesheet_path(hash: &str) -> String {
    if hash.is_empty() {
        "/static/css/main.css".to_string()
    } else {
        format!("/static/css/derived/main.{hash}.css")
    }
}

/// Returns the stylesheet path, fingerprinted when the build hashed main.css.
///
/// Usage in templates: `{{ ""|stylesheet }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn stylesheet(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(stylesheet_path(env!("CSS_HASH")))
}
