use reelist_config::{Config, PathManager};
use reelist_models::{MovieId, WatchlistCollection, WatchlistEntry};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use crate::error::StoreError;
use crate::snapshot;
use crate::storage::{CollectionLock, FileSnapshotStorage, SnapshotStorage};

/// Sole owner and writer of one persisted watchlist collection.
///
/// Every call runs under a single FIFO lock, so `add`/`remove`/`clear` are
/// linearizable even though each one reads and rewrites the whole snapshot.
/// Mutations also hold the storage's collection lock, which orders them against
/// other stores (or processes) sharing the same backing files.
/// Cloning yields another handle to the same store; controllers each hold one.
///
/// Mutations run on a spawned task: dropping the returned future does not
/// abort a write halfway through its read-modify-write.
#[derive(Clone)]
pub struct WatchlistStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    collection: String,
    storage: Arc<dyn SnapshotStorage>,
    lock: Mutex<()>,
}

impl std::fmt::Debug for WatchlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchlistStore")
            .field("collection", &self.inner.collection)
            .finish()
    }
}

impl WatchlistStore {
    pub fn new(collection: impl Into<String>, storage: Arc<dyn SnapshotStorage>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                collection: collection.into(),
                storage,
                lock: Mutex::new(()),
            }),
        }
    }

    /// File-backed store for the configured collection.
    pub fn from_config(config: &Config, paths: &PathManager) -> Self {
        let dir = config.store_dir(paths.store_dir());
        debug!("Opening watchlist '{}' in {:?}", config.storage.collection, dir);
        Self::new(
            config.storage.collection.clone(),
            Arc::new(FileSnapshotStorage::new(dir)),
        )
    }

    pub fn collection_name(&self) -> &str {
        &self.inner.collection
    }

    /// Current collection. A corrupt snapshot is logged, backed up and read as empty.
    pub async fn load(&self) -> Result<WatchlistCollection, StoreError> {
        let _guard = self.inner.lock.lock().await;
        self.inner.read_recovering().await
    }

    /// Like [`load`](Self::load) but surfaces a corrupt snapshot as [`StoreError::CorruptState`].
    pub async fn try_load(&self) -> Result<WatchlistCollection, StoreError> {
        let _guard = self.inner.lock.lock().await;
        self.inner.read_strict().await
    }

    pub async fn contains(&self, id: MovieId) -> Result<bool, StoreError> {
        Ok(self.load().await?.contains(id))
    }

    pub async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load().await?.len())
    }

    /// Append `entry` unless its id is already present. Returns whether anything changed.
    pub async fn add(&self, entry: WatchlistEntry) -> Result<bool, StoreError> {
        self.run_to_completion(move |inner| async move { inner.add(entry).await })
            .await
    }

    /// Drop the entry with `id` if present. Returns whether anything changed.
    pub async fn remove(&self, id: MovieId) -> Result<bool, StoreError> {
        self.run_to_completion(move |inner| async move { inner.remove(id).await })
            .await
    }

    /// Replace the snapshot with an empty collection.
    pub async fn clear(&self) -> Result<bool, StoreError> {
        self.run_to_completion(|inner| async move { inner.clear().await })
            .await
    }

    async fn run_to_completion<F, Fut>(&self, op: F) -> Result<bool, StoreError>
    where
        F: FnOnce(Arc<StoreInner>) -> Fut,
        Fut: Future<Output = Result<bool, StoreError>> + Send + 'static,
    {
        let handle = tokio::spawn(op(self.inner.clone()));
        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(StoreError::Interrupted {
                collection: self.inner.collection.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

impl StoreInner {
    async fn add(&self, entry: WatchlistEntry) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let _held = self.lock_storage().await?;
        let (mut collection, _) = self.read_or_discard().await?;
        let id = entry.id;
        if !collection.insert(entry) {
            debug!("Movie {} already in watchlist '{}'", id, self.collection);
            return Ok(false);
        }
        self.persist(&collection).await?;
        info!("Added movie {} to watchlist '{}' ({} entries)", id, self.collection, collection.len());
        Ok(true)
    }

    async fn remove(&self, id: MovieId) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let _held = self.lock_storage().await?;
        let (mut collection, _) = self.read_or_discard().await?;
        if !collection.remove(id) {
            debug!("Movie {} not in watchlist '{}', nothing to remove", id, self.collection);
            return Ok(false);
        }
        self.persist(&collection).await?;
        info!("Removed movie {} from watchlist '{}' ({} entries)", id, self.collection, collection.len());
        Ok(true)
    }

    /// A discarded corrupt snapshot counts as a change.
    async fn clear(&self) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let _held = self.lock_storage().await?;
        let (existing, discarded) = self.read_or_discard().await?;
        self.persist(&WatchlistCollection::new()).await?;
        info!("Cleared watchlist '{}' ({} entries removed)", self.collection, existing.len());
        Ok(discarded || !existing.is_empty())
    }

    async fn lock_storage(&self) -> Result<CollectionLock, StoreError> {
        self.storage
            .lock(&self.collection)
            .await
            .map_err(|source| StoreError::Persistence {
                collection: self.collection.clone(),
                action: "lock",
                source,
            })
    }

    async fn read_bytes(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.storage
            .read(&self.collection)
            .await
            .map_err(|source| StoreError::Persistence {
                collection: self.collection.clone(),
                action: "read",
                source,
            })
    }

    async fn read_strict(&self) -> Result<WatchlistCollection, StoreError> {
        let Some(bytes) = self.read_bytes().await? else {
            return Ok(WatchlistCollection::new());
        };
        self.decode(&bytes)
    }

    async fn read_recovering(&self) -> Result<WatchlistCollection, StoreError> {
        Ok(self.read_or_discard().await?.0)
    }

    /// Decoded collection, or an empty one plus `true` when undecodable bytes were set aside.
    async fn read_or_discard(&self) -> Result<(WatchlistCollection, bool), StoreError> {
        let Some(bytes) = self.read_bytes().await? else {
            return Ok((WatchlistCollection::new(), false));
        };
        match self.decode(&bytes) {
            Ok(collection) => Ok((collection, false)),
            Err(e) => {
                warn!("{}. Treating watchlist as empty.", e);
                if let Err(backup_err) = self.storage.backup_corrupt(&self.collection, &bytes).await {
                    warn!("Failed to back up corrupt watchlist snapshot: {}", backup_err);
                }
                Ok((WatchlistCollection::new(), true))
            }
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<WatchlistCollection, StoreError> {
        let decoded = snapshot::decode(bytes).map_err(|reason| StoreError::CorruptState {
            collection: self.collection.clone(),
            reason,
        })?;
        if decoded.migrated_from_legacy {
            debug!(
                "Watchlist '{}' uses the unversioned layout; it is rewritten as version {} on the next change",
                self.collection,
                snapshot::SNAPSHOT_VERSION
            );
        }
        if decoded.duplicates_dropped > 0 {
            warn!(
                "Watchlist '{}' contained {} duplicate entries; kept the first of each",
                self.collection, decoded.duplicates_dropped
            );
        }
        Ok(decoded.collection)
    }

    async fn persist(&self, collection: &WatchlistCollection) -> Result<(), StoreError> {
        let bytes = snapshot::encode(collection).map_err(|source| StoreError::Encode {
            collection: self.collection.clone(),
            source,
        })?;
        self.storage
            .write(&self.collection, &bytes)
            .await
            .map_err(|source| {
                warn!("Failed to write watchlist '{}': {}", self.collection, source);
                StoreError::Persistence {
                    collection: self.collection.clone(),
                    action: "write",
                    source,
                }
            })
    }
}

#[cfg(test)]
mod tests;
