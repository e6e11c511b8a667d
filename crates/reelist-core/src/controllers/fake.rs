use async_trait::async_trait;
use reelist_catalog::{CatalogClient, CatalogError};
use reelist_models::{CatalogRecord, MovieId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned catalog. Lists set to `None` answer with a 503, unknown detail ids
/// with a 404, and every detail lookup with a 503 while `detail_outage` is set.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub trending: Option<Vec<CatalogRecord>>,
    pub popular: Option<Vec<CatalogRecord>>,
    pub search_results: Option<Vec<CatalogRecord>>,
    pub details: HashMap<MovieId, CatalogRecord>,
    pub detail_outage: bool,
    pub calls: AtomicUsize,
}

pub(crate) fn record(id: u64, title: &str) -> CatalogRecord {
    CatalogRecord::summary(MovieId(id), title, format!("/{}.jpg", id), 7.4)
}

fn unavailable() -> CatalogError {
    CatalogError::Status {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

impl FakeCatalog {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn list(&self, list: &Option<Vec<CatalogRecord>>) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        list.clone().ok_or_else(unavailable)
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    fn catalog_name(&self) -> &str {
        "fake"
    }

    async fn fetch_trending(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.list(&self.trending)
    }

    async fn fetch_popular(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.list(&self.popular)
    }

    async fn search(&self, _query: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.list(&self.search_results)
    }

    async fn fetch_detail(&self, id: MovieId) -> Result<CatalogRecord, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.detail_outage {
            return Err(unavailable());
        }
        self.details.get(&id).cloned().ok_or(CatalogError::Status {
            status: 404,
            body: format!("movie {} not found", id),
        })
    }
}
