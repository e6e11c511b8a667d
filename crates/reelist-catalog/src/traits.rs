use async_trait::async_trait;
use reelist_models::{CatalogRecord, MovieId};
use crate::error::CatalogError;

/// Remote movie catalog consumed by the screens.
///
/// List calls return summary records; [`CatalogClient::fetch_detail`] returns
/// the rich record including credits and videos.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    fn catalog_name(&self) -> &str;

    async fn fetch_trending(&self) -> Result<Vec<CatalogRecord>, CatalogError>;
    async fn fetch_popular(&self) -> Result<Vec<CatalogRecord>, CatalogError>;
    async fn search(&self, query: &str) -> Result<Vec<CatalogRecord>, CatalogError>;
    async fn fetch_detail(&self, id: MovieId) -> Result<CatalogRecord, CatalogError>;
}
