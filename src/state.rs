use crate::catalog::{CatalogStore, ReloadOutcome};
use crate::error::CatalogError;
use crate::loader::{CatalogLoader, CatalogSource};
use std::sync::Arc;

/// Default image shown for addons without an icon or with a broken one
pub const DEFAULT_IMAGE_PLACEHOLDER: &str = "https://via.placeholder.com/280x160?text=No+Image";

/// Settings of the web UI
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Address paid addons are purchased through
    pub contact_email: String,
    pub image_placeholder: String,
    /// Delay before the search box submits itself while typing
    pub debounce_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            contact_email: "you@example.com".to_string(),
            image_placeholder: DEFAULT_IMAGE_PLACEHOLDER.to_string(),
            debounce_ms: 300,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub loader: Arc<CatalogLoader>,
    pub source: Arc<CatalogSource>,
    pub ui: Arc<UiConfig>,
}

impl AppState {
    pub fn new(loader: CatalogLoader, source: CatalogSource, ui: UiConfig) -> Self {
        Self {
            catalog: Arc::new(CatalogStore::new()),
            loader: Arc::new(loader),
            source: Arc::new(source),
            ui: Arc::new(ui),
        }
    }

    /// Reloads the catalog from the configured source
    pub async fn reload(&self) -> Result<ReloadOutcome, CatalogError> {
        let result = self.catalog.reload(&self.loader, &self.source).await;

        match &result {
            Ok(ReloadOutcome::Applied(count)) => {
                tracing::info!("Catalog reloaded: {} addons", count)
            }
            Ok(ReloadOutcome::Superseded) => {
                tracing::debug!("Catalog reload superseded by a newer one")
            }
            Err(err) => tracing::error!("Failed to load catalog from {}: {}", self.source, err),
        }

        result
    }
}
