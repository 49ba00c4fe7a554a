//! Formspree client for contact form delivery.
//!
//! Forwards a validated [`ContactSubmission`] as JSON to
//! `<endpoint>/<form id>`. Only the response status is interpreted: 2xx is
//! delivered, anything else is an error.

use muva_core::ContactSubmission;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Errors that can occur when submitting to Formspree.
#[derive(Debug, Error)]
pub enum FormspreeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The form id cannot be used as a URL path segment.
    #[error("Invalid form id: {0}")]
    InvalidFormId(String),
}

/// Formspree API client.
#[derive(Clone)]
pub struct FormspreeClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl FormspreeClient {
    /// Create a new client posting to `endpoint` (e.g. `https://formspree.io/f/`).
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(endpoint: Url) -> Result<Self, FormspreeError> {
        let mut headers = HeaderMap::new();
        // Without this Formspree answers with an HTML redirect page
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// The URL a form id posts to.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormId` if the id is empty or contains a path
    /// separator or query characters.
    pub fn form_url(&self, form_id: &str) -> Result<Url, FormspreeError> {
        if form_id.is_empty() || form_id.contains(['/', '?', '#', '\\']) {
            return Err(FormspreeError::InvalidFormId(form_id.to_string()));
        }
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| FormspreeError::InvalidFormId(form_id.to_string()))?
            .pop_if_empty()
            .push(form_id);
        Ok(url)
    }

    /// Deliver a contact submission.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not 2xx.
    #[instrument(skip(self, submission), fields(form_id = %submission.form_id))]
    pub async fn submit(&self, submission: &ContactSubmission) -> Result<(), FormspreeError> {
        let url = self.form_url(&submission.form_id)?;

        let response = self
            .client
            .post(url)
            .json(&submission.payload)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FormspreeError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        Ok(())
    }
}
