use reelist_models::{MovieId, WatchlistCollection, WatchlistEntry};
use tracing::{debug, warn};
use crate::error::StoreError;
use crate::store::WatchlistStore;

/// The watchlist screen. Holds a disposable copy that is reloaded every time
/// the screen becomes visible and after every removal.
pub struct WatchlistController {
    store: WatchlistStore,
    entries: WatchlistCollection,
    stale: bool,
}

impl WatchlistController {
    pub fn new(store: WatchlistStore) -> Self {
        Self {
            store,
            entries: WatchlistCollection::new(),
            stale: false,
        }
    }

    /// Replace the displayed entries with the store's current collection.
    pub async fn on_visible(&mut self) -> Result<(), StoreError> {
        self.entries = self.store.load().await?;
        self.stale = false;
        debug!("Watchlist screen showing {} entries", self.entries.len());
        Ok(())
    }

    /// Remove through the store, then reload. Returns whether the entry was present.
    ///
    /// Errors come from the removal only. A failed reload is logged and leaves
    /// the previous entries on screen, marked stale.
    pub async fn remove(&mut self, id: MovieId) -> Result<bool, StoreError> {
        let removed = self.store.remove(id).await?;
        if let Err(e) = self.on_visible().await {
            warn!("Could not reload watchlist after removing movie {}: {}", id, e);
            self.stale = true;
        }
        Ok(removed)
    }

    /// The entries no longer match the store and should be reloaded.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        self.entries.entries()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
