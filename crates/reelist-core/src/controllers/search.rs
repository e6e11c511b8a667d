use reelist_catalog::CatalogClient;
use reelist_models::CatalogRecord;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// Nothing searched yet.
    Idle,
    /// Results for `query`; empty means "no results".
    Results { query: String, records: Vec<CatalogRecord> },
    Unavailable { query: String, reason: String },
}

pub struct SearchController {
    catalog: Arc<dyn CatalogClient>,
    state: SearchState,
}

impl SearchController {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            state: SearchState::Idle,
        }
    }

    /// Run a search. Blank queries are ignored and leave the state untouched.
    /// Returns whether a search was issued.
    pub async fn search(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank search query");
            return false;
        }

        self.state = match self.catalog.search(query).await {
            Ok(records) => SearchState::Results {
                query: query.to_string(),
                records,
            },
            Err(e) => {
                warn!("Search for {:?} failed: {}", query, e);
                SearchState::Unavailable {
                    query: query.to_string(),
                    reason: e.to_string(),
                }
            }
        };
        true
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn results(&self) -> &[CatalogRecord] {
        match &self.state {
            SearchState::Results { records, .. } => records,
            _ => &[],
        }
    }
}
