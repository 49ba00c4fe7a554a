//! CLI command implementations.

pub mod catalog;
pub mod settings;

use std::path::Path;

use thiserror::Error;

/// Errors shared by the feed commands.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Catalog(#[from] muva_core::CatalogError),

    #[error("{0} issue(s) found in strict mode")]
    Strict(usize),
}

/// Read and parse a JSON feed file.
pub async fn read_feed(path: &Path) -> Result<serde_json::Value, FeedError> {
    let display = path.display().to_string();
    let bytes = tokio::fs::read(path).await.map_err(|source| FeedError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| FeedError::Json {
        path: display,
        source,
    })
}
