use async_trait::async_trait;
use reelist_config::{TmdbConfig, TrendingWindow};
use reelist_models::{CatalogRecord, MovieId};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use crate::error::CatalogError;
use crate::tmdb::api::{self, TmdbMovie, TmdbPage};
use crate::traits::CatalogClient;

/// TMDB v3 catalog client.
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    language: String,
    trending_window: TrendingWindow,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig, api_key: Option<String>) -> Result<Self, CatalogError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(CatalogError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("reelist/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!("Created TMDB client for {} ({})", config.api_base_url, config.language);

        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url: config.api_base_url.clone(),
            language: config.language.clone(),
            trending_window: config.trending_window,
        })
    }

    async fn fetch_list(&self, path: &str, extra_query: &[(&str, &str)]) -> Result<Vec<CatalogRecord>, CatalogError> {
        let page: TmdbPage = api::get_json(
            &self.client,
            &self.base_url,
            path,
            &self.api_key,
            &self.language,
            extra_query,
        )
        .await?;
        let records = api::page_into_records(page);
        debug!("TMDB {} yielded {} movies", path, records.len());
        Ok(records)
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    fn catalog_name(&self) -> &str {
        "tmdb"
    }

    async fn fetch_trending(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        let path = format!("trending/movie/{}", self.trending_window);
        self.fetch_list(&path, &[]).await
    }

    async fn fetch_popular(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.fetch_list("movie/popular", &[]).await
    }

    async fn search(&self, query: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.fetch_list("search/movie", &[("query", query.trim())]).await
    }

    async fn fetch_detail(&self, id: MovieId) -> Result<CatalogRecord, CatalogError> {
        let path = format!("movie/{}", id);
        let movie: TmdbMovie = api::get_json(
            &self.client,
            &self.base_url,
            &path,
            &self.api_key,
            &self.language,
            &[("append_to_response", "credits,videos")],
        )
        .await?;

        movie.into_record().ok_or_else(|| CatalogError::Status {
            status: 404,
            body: format!("movie {} has no title", id),
        })
    }
}
