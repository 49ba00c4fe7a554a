//! Catalog and settings feed loader.
//!
//! Fetches both feeds concurrently. Neither failure is fatal:
//! - catalog failure → empty catalog plus [`FALLBACK_NOTICE`](super::FALLBACK_NOTICE)
//! - settings failure → empty settings (features disabled), logged only

use std::time::{SystemTime, UNIX_EPOCH};

use muva_core::{Catalog, CatalogError, Settings};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use super::{CatalogStore, FALLBACK_NOTICE, LoadedCatalog};
use crate::config::FeedConfig;

/// Query parameter appended to the settings URL to defeat caches.
const CACHE_BUST_PARAM: &str = "v";

/// Errors that can occur while fetching a feed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// HTTP request failed (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed answered with a non-success status.
    #[error("feed returned status {0}")]
    Status(u16),

    /// Body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Body was JSON but not a catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fetches the catalog and settings feeds.
#[derive(Clone)]
pub struct CatalogLoader {
    client: reqwest::Client,
    catalog_url: Url,
    settings_url: Url,
}

impl CatalogLoader {
    /// Create a loader for the configured feeds.
    #[must_use]
    pub fn new(client: reqwest::Client, feeds: &FeedConfig) -> Self {
        Self {
            client,
            catalog_url: feeds.catalog_url.clone(),
            settings_url: feeds.settings_url.clone(),
        }
    }

    /// Fetch both feeds concurrently and degrade each failure independently.
    #[instrument(skip(self), fields(catalog_url = %self.catalog_url, settings_url = %self.settings_url))]
    pub async fn load(&self) -> LoadedCatalog {
        let (catalog, settings) = tokio::join!(self.fetch_catalog(), self.fetch_settings());

        let (catalog, notice) = match catalog {
            Ok(catalog) => (catalog, None),
            Err(e) => {
                warn!(error = %e, "Catalog feed unavailable, using empty catalog");
                (Catalog::empty(), Some(FALLBACK_NOTICE.to_string()))
            }
        };

        let settings = settings.unwrap_or_else(|e| {
            warn!(error = %e, "Settings feed unavailable, secondary features disabled");
            Settings::default()
        });

        info!(
            products = catalog.len(),
            booking_enabled = settings.booking_url().is_some(),
            contact_enabled = settings.form_id().is_some(),
            "Catalog loaded"
        );

        LoadedCatalog {
            catalog,
            settings,
            notice,
        }
    }

    /// Fetch and normalize the catalog feed.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` on transport failure, non-2xx status, invalid JSON
    /// or a document that is not a list.
    #[instrument(skip(self))]
    pub async fn fetch_catalog(&self) -> Result<Catalog, LoadError> {
        let response = self
            .client
            .get(self.catalog_url.clone())
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let document = read_json(response).await?;
        let parsed = Catalog::from_json(&document)?;
        for issue in &parsed.issues {
            warn!(%issue, "Catalog feed entry normalized");
        }
        Ok(parsed.catalog)
    }

    /// Fetch the settings feed with a cache-busting parameter.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` on transport failure, non-2xx status or invalid
    /// JSON. Any JSON shape is accepted.
    #[instrument(skip(self))]
    pub async fn fetch_settings(&self) -> Result<Settings, LoadError> {
        let response = self
            .client
            .get(cache_busted(&self.settings_url))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let document = read_json(response).await?;
        Ok(Settings::from_json(&document))
    }
}

/// Check the status and parse the body as JSON.
async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, LoadError> {
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// `url` with `v=<unix millis>` appended.
fn cache_busted(url: &Url) -> Url {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let mut url = url.clone();
    url.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &millis.to_string());
    url
}

/// Spawn a background task that loads the feeds into `store`.
///
/// Until it completes, `store.is_loading()` stays true.
pub fn load_catalog_async(store: CatalogStore, loader: CatalogLoader) {
    info!("Spawning background catalog load task");
    tokio::spawn(async move {
        let loaded = loader.load().await;
        if store.install(loaded) {
            info!("Catalog is now ready and serving requests");
        }
    });
}
