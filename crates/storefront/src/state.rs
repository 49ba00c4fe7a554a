//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogLoader, CatalogStore, load_catalog_async};
use crate::config::StorefrontConfig;
use crate::services::{FormspreeClient, FormspreeError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and is the single owner of
/// the loaded catalog, the settings and the outbound clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogStore,
    loader: CatalogLoader,
    formspree: FormspreeClient,
}

impl AppState {
    /// Create a new application state with nothing loaded yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, FormspreeError> {
        let http = reqwest::Client::builder().build()?;
        let loader = CatalogLoader::new(http, &config.feeds);
        let formspree = FormspreeClient::new(config.feeds.formspree_endpoint.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: CatalogStore::new(),
                loader,
                formspree,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the loaded catalog slot.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the Formspree client.
    #[must_use]
    pub fn formspree(&self) -> &FormspreeClient {
        &self.inner.formspree
    }

    /// Start loading the feeds in the background.
    pub fn start_catalog_load(&self) {
        load_catalog_async(self.inner.catalog.clone(), self.inner.loader.clone());
    }

    /// Load the feeds and wait for the result to be installed.
    pub async fn load_catalog(&self) {
        let loaded = self.inner.loader.load().await;
        self.inner.catalog.install(loaded);
    }
}
