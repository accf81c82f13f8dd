use crate::error::CatalogError;
use crate::models::Addon;
use crate::normalizer::normalize;
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default fetch timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameter appended to remote requests to defeat intermediate caches
const CACHE_BUST_PARAM: &str = "_";

/// Where the catalog document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Remote(Url),
    Local(PathBuf),
}

impl FromStr for CatalogSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            anyhow::bail!("Catalog location is empty");
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(s).with_context(|| format!("Invalid catalog URL: {}", s))?;
            return Ok(CatalogSource::Remote(url));
        }

        let path = s.strip_prefix("file://").unwrap_or(s);
        Ok(CatalogSource::Local(PathBuf::from(path)))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Remote(url) => write!(f, "{}", url),
            CatalogSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches and normalizes the catalog document.
///
/// One request per call: no retries and nothing cached between calls.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    client: reqwest::Client,
}

impl CatalogLoader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("addon-store/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Loads the catalog from `source` and returns the canonical addons
    pub async fn load(&self, source: &CatalogSource) -> Result<Vec<Addon>, CatalogError> {
        tracing::debug!("Loading catalog from {}", source);

        let body = match source {
            CatalogSource::Remote(url) => self.fetch_remote(url).await?,
            CatalogSource::Local(path) => tokio::fs::read(path)
                .await
                .map_err(|err| CatalogError::network(path.display().to_string(), err))?,
        };

        let document: serde_json::Value = serde_json::from_slice(&body)?;
        let addons = normalize(document)?;

        tracing::info!("Loaded {} addons from {}", addons.len(), source);

        Ok(addons)
    }

    async fn fetch_remote(&self, url: &Url) -> Result<Vec<u8>, CatalogError> {
        let mut request_url = url.clone();
        request_url.query_pairs_mut().append_pair(
            CACHE_BUST_PARAM,
            &Utc::now().timestamp_millis().to_string(),
        );

        let response = self
            .client
            .get(request_url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|err| CatalogError::network(url.as_str(), err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::network(
                url.as_str(),
                format!("HTTP {}", status),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| CatalogError::network(url.as_str(), err))?;

        Ok(body.to_vec())
    }
}
