use thiserror::Error;

/// The catalog could not produce an answer.
///
/// Every variant means "catalog unavailable" to a caller; screens render an
/// unavailable state instead of propagating it.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode catalog response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no TMDB API key configured (set TMDB_API_KEY or run `reelist config tmdb`)")]
    MissingApiKey,
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Status { status: 404, .. })
    }
}
