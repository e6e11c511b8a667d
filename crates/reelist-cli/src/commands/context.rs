use color_eyre::Result;
use reelist_catalog::{CatalogClient, ImageUrlBuilder, TmdbClient};
use reelist_config::{Config, CredentialStore, PathManager};
use reelist_core::WatchlistStore;
use std::sync::Arc;

/// Everything a command needs, built once per invocation.
///
/// One [`WatchlistStore`] is shared by every controller a command creates.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub store: WatchlistStore,
}

impl AppContext {
    pub fn new(paths: PathManager, config: Config) -> Self {
        let store = WatchlistStore::from_config(&config, &paths);
        Self { paths, config, store }
    }

    pub fn credentials(&self) -> Result<CredentialStore> {
        let credentials_file = self.paths.credentials_file();
        let mut store = CredentialStore::new(credentials_file.clone());
        store.load().map_err(|e| {
            color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e)
        })?;
        Ok(store)
    }

    pub fn catalog(&self) -> Result<Arc<dyn CatalogClient>> {
        let api_key = self.credentials()?.resolve_tmdb_api_key();
        let client = TmdbClient::new(&self.config.tmdb, api_key)
            .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
        Ok(Arc::new(client))
    }

    pub fn images(&self) -> ImageUrlBuilder {
        ImageUrlBuilder::new(self.config.tmdb.image_base_url.clone())
    }
}
