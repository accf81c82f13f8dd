use crate::error::CatalogError;
use crate::loader::{CatalogLoader, CatalogSource};
use crate::models::Addon;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Lifecycle of the in-memory catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No load has been started yet
    Idle,
    Loading,
    Loaded,
    /// Last load failed, with the error description
    Failed(String),
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Loaded => "loaded",
            LoadStatus::Failed(_) => "failed",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Point-in-time view of the catalog, cheap to clone
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub status: LoadStatus,
    pub addons: Arc<Vec<Addon>>,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Result of a reload that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The new catalog replaced the old one
    Applied(usize),
    /// A more recent reload was started meanwhile; this result was dropped
    Superseded,
}

/// Identifies one load attempt. Only the most recently issued ticket may
/// change the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct Inner {
    status: LoadStatus,
    addons: Arc<Vec<Addon>>,
    loaded_at: Option<DateTime<Utc>>,
    latest_ticket: u64,
}

/// Owns the canonical catalog and its load state machine
#[derive(Debug)]
pub struct CatalogStore {
    inner: RwLock<Inner>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                status: LoadStatus::Idle,
                addons: Arc::new(Vec::new()),
                loaded_at: None,
                latest_ticket: 0,
            }),
        }
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        let inner = self.inner.read().await;
        CatalogSnapshot {
            status: inner.status.clone(),
            addons: Arc::clone(&inner.addons),
            loaded_at: inner.loaded_at,
        }
    }

    /// Loads the catalog and applies the result unless a newer reload started
    pub async fn reload(
        &self,
        loader: &CatalogLoader,
        source: &CatalogSource,
    ) -> Result<ReloadOutcome, CatalogError> {
        let ticket = self.begin().await;
        let result = loader.load(source).await;
        self.finish(ticket, result).await
    }

    /// Enters `Loading` and issues a ticket newer than every previous one
    pub async fn begin(&self) -> LoadTicket {
        let mut inner = self.inner.write().await;
        inner.latest_ticket += 1;
        inner.status = LoadStatus::Loading;
        LoadTicket(inner.latest_ticket)
    }

    /// Applies the result of the load identified by `ticket`.
    ///
    /// Failures keep the previous catalog in place.
    pub async fn finish(
        &self,
        ticket: LoadTicket,
        result: Result<Vec<Addon>, CatalogError>,
    ) -> Result<ReloadOutcome, CatalogError> {
        let mut inner = self.inner.write().await;

        if ticket.0 != inner.latest_ticket {
            tracing::debug!(
                "Discarding result of superseded load {} (latest is {})",
                ticket.0,
                inner.latest_ticket
            );
            return Ok(ReloadOutcome::Superseded);
        }

        match result {
            Ok(addons) => {
                let count = addons.len();
                inner.addons = Arc::new(addons);
                inner.loaded_at = Some(Utc::now());
                inner.status = LoadStatus::Loaded;
                Ok(ReloadOutcome::Applied(count))
            }
            Err(err) => {
                inner.status = LoadStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }
}
