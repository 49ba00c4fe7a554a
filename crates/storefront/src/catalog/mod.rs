//! Runtime catalog and settings, loaded once from the feeds.
//!
//! The app starts immediately with nothing loaded. A background task fetches
//! the catalog and settings feeds concurrently and installs the result
//! atomically. Until then [`CatalogStore::is_loading`] is true and pages
//! render a loading state; after that it is false for the life of the
//! process (no refetch, no polling).

mod loader;

use std::sync::{Arc, RwLock};

use muva_core::{Catalog, Settings};

pub use loader::{CatalogLoader, LoadError, load_catalog_async};

/// Shown above the catalog when the catalog feed could not be used.
pub const FALLBACK_NOTICE: &str =
    "Using fallback catalog. Upload catalog.json to control inventory.";

/// Everything the pages need from the feeds.
#[derive(Debug, Clone, Default)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub settings: Settings,
    /// Visitor-facing advisory when the catalog degraded to empty.
    pub notice: Option<String>,
}

impl LoadedCatalog {
    /// A loaded state with the given catalog and settings and no notice.
    #[must_use]
    pub const fn new(catalog: Catalog, settings: Settings) -> Self {
        Self {
            catalog,
            settings,
            notice: None,
        }
    }
}

/// Shared slot for the loaded catalog.
///
/// Cheap to clone; all clones see the same slot.
#[derive(Clone, Default)]
pub struct CatalogStore {
    inner: Arc<RwLock<Option<Arc<LoadedCatalog>>>>,
}

impl CatalogStore {
    /// Create an empty (loading) store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first load has been installed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.read().map(|guard| guard.is_none()).unwrap_or(true)
    }

    /// The loaded catalog, or `None` while loading.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<LoadedCatalog>> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    /// Install the load result. Only the first install takes effect.
    ///
    /// Returns `false` if a catalog was already installed.
    pub fn install(&self, loaded: LoadedCatalog) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            tracing::error!("Catalog store lock poisoned");
            return false;
        };
        if guard.is_some() {
            tracing::warn!("Catalog already loaded, ignoring second install");
            return false;
        }
        *guard = Some(Arc::new(loaded));
        true
    }
}
