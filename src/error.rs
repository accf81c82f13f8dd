use thiserror::Error;

/// Ways a catalog load can fail. Each one ends the attempt; nothing is retried.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure, timeout, non-success status or unreadable local file
    #[error("failed to fetch catalog from {location}: {reason}")]
    Network { location: String, reason: String },

    /// The body is not valid JSON
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Valid JSON, but the top-level value is not an array
    #[error("invalid catalog format: expected an array of addons, found {found}")]
    InvalidFormat { found: &'static str },
}

impl CatalogError {
    pub fn network(location: impl Into<String>, reason: impl ToString) -> Self {
        CatalogError::Network {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
