use reelist_catalog::CatalogClient;
use std::sync::Arc;
use tracing::warn;
use super::ListState;

/// Trending and popular lists, fetched together.
pub struct HomeController {
    catalog: Arc<dyn CatalogClient>,
    trending: ListState,
    popular: ListState,
}

impl HomeController {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            trending: ListState::Loading,
            popular: ListState::Loading,
        }
    }

    /// Fetch both lists concurrently. Each one degrades to unavailable on its own.
    pub async fn refresh(&mut self) {
        self.trending = ListState::Loading;
        self.popular = ListState::Loading;

        let (trending, popular) = futures::join!(self.catalog.fetch_trending(), self.catalog.fetch_popular());

        if let Err(e) = &trending {
            warn!("Trending movies unavailable from {}: {}", self.catalog.catalog_name(), e);
        }
        if let Err(e) = &popular {
            warn!("Popular movies unavailable from {}: {}", self.catalog.catalog_name(), e);
        }

        self.trending = ListState::from_result(trending);
        self.popular = ListState::from_result(popular);
    }

    pub fn trending(&self) -> &ListState {
        &self.trending
    }

    pub fn popular(&self) -> &ListState {
        &self.popular
    }
}
