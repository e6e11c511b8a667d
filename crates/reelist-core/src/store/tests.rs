use super::*;
use crate::storage::MemorySnapshotStorage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::io;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Semaphore;

const COLLECTION: &str = "watchlist";

fn entry(id: u64, title: &str) -> WatchlistEntry {
    WatchlistEntry {
        id: MovieId(id),
        title: title.to_string(),
        poster_path: format!("/{}.jpg", id),
        vote_average: 7.0,
        release_date: None,
    }
}

fn memory_store() -> (WatchlistStore, Arc<MemorySnapshotStorage>) {
    let storage = Arc::new(MemorySnapshotStorage::new());
    let store = WatchlistStore::new(COLLECTION, storage.clone());
    (store, storage)
}

/// Yields between every storage call so interleavings actually happen.
struct InterleavingStorage {
    inner: MemorySnapshotStorage,
}

#[async_trait]
impl SnapshotStorage for InterleavingStorage {
    async fn read(&self, collection: &str) -> io::Result<Option<Vec<u8>>> {
        tokio::task::yield_now().await;
        let bytes = self.inner.read(collection).await;
        tokio::task::yield_now().await;
        bytes
    }

    async fn write(&self, collection: &str, bytes: &[u8]) -> io::Result<()> {
        tokio::task::yield_now().await;
        self.inner.write(collection, bytes).await
    }

    async fn backup_corrupt(&self, collection: &str, bytes: &[u8]) -> io::Result<()> {
        self.inner.backup_corrupt(collection, bytes).await
    }
}

/// Writes block until the test hands out a permit.
struct GatedStorage {
    inner: MemorySnapshotStorage,
    gate: Arc<Semaphore>,
}

#[async_trait]
impl SnapshotStorage for GatedStorage {
    async fn read(&self, collection: &str) -> io::Result<Option<Vec<u8>>> {
        self.inner.read(collection).await
    }

    async fn write(&self, collection: &str, bytes: &[u8]) -> io::Result<()> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        permit.forget();
        self.inner.write(collection, bytes).await
    }

    async fn backup_corrupt(&self, collection: &str, bytes: &[u8]) -> io::Result<()> {
        self.inner.backup_corrupt(collection, bytes).await
    }
}

struct UnreadableStorage;

#[async_trait]
impl SnapshotStorage for UnreadableStorage {
    async fn read(&self, _collection: &str) -> io::Result<Option<Vec<u8>>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
    }

    async fn write(&self, _collection: &str, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }

    async fn backup_corrupt(&self, _collection: &str, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_load_without_snapshot_is_empty() {
    let (store, storage) = memory_store();
    assert!(store.load().await.unwrap().is_empty());
    assert!(storage.raw(COLLECTION).is_none());
}

#[tokio::test]
async fn test_add_to_empty_then_load() {
    let (store, _) = memory_store();
    let inception = WatchlistEntry {
        id: MovieId(27205),
        title: "Inception".to_string(),
        poster_path: "/inception.jpg".to_string(),
        vote_average: 8.8,
        release_date: None,
    };

    assert!(store.add(inception.clone()).await.unwrap());

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.entries(), &[inception]);
    assert_eq!(loaded.entries()[0].release_date, None);
}

#[tokio::test]
async fn test_remove_keeps_remaining_entries() {
    let (store, _) = memory_store();
    store.add(entry(1, "One")).await.unwrap();
    store.add(entry(2, "Two")).await.unwrap();

    assert!(store.remove(MovieId(1)).await.unwrap());

    assert_eq!(store.load().await.unwrap().ids(), vec![MovieId(2)]);
    assert!(!store.contains(MovieId(1)).await.unwrap());
}

#[tokio::test]
async fn test_add_is_idempotent_and_keeps_first_values() {
    let (store, _) = memory_store();
    assert!(store.add(entry(7, "Original")).await.unwrap());
    assert!(!store.add(entry(7, "Renamed")).await.unwrap());

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get(MovieId(7)).unwrap().title, "Original");
}

#[tokio::test]
async fn test_remove_absent_is_noop() {
    let (store, storage) = memory_store();
    store.add(entry(2, "Two")).await.unwrap();
    let before = storage.raw(COLLECTION);

    assert!(!store.remove(MovieId(99)).await.unwrap());

    assert_eq!(storage.raw(COLLECTION), before);
    assert_eq!(store.load().await.unwrap().ids(), vec![MovieId(2)]);
}

#[tokio::test]
async fn test_malformed_snapshot_loads_empty_and_recovers_on_add() {
    let (store, storage) = memory_store();
    storage.put_raw(COLLECTION, b"[{\"id\": 1, \"title\": \"Trunc".to_vec());

    assert!(store.load().await.unwrap().is_empty());
    assert!(storage.backup(COLLECTION).is_some());

    store.add(entry(5, "Five")).await.unwrap();
    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.ids(), vec![MovieId(5)]);
}

#[tokio::test]
async fn test_try_load_surfaces_corrupt_state() {
    let (store, storage) = memory_store();
    storage.put_raw(COLLECTION, b"not json".to_vec());

    let err = store.try_load().await.unwrap_err();
    assert!(err.is_corrupt_state());
    assert!(!err.is_write_failure());
}

#[tokio::test]
async fn test_newer_snapshot_version_is_not_guessed_at() {
    let (store, storage) = memory_store();
    storage.put_raw(COLLECTION, br#"{"version": 9, "entries": []}"#.to_vec());

    assert!(store.try_load().await.unwrap_err().is_corrupt_state());
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_legacy_snapshot_is_migrated_on_next_write() {
    let (store, storage) = memory_store();
    storage.put_raw(
        COLLECTION,
        br#"[{"id": 680, "title": "Pulp Fiction", "poster_path": "/p.jpg", "vote_average": 8.5, "release_date": "1994-09-10"}]"#.to_vec(),
    );

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.get(MovieId(680)).unwrap().release_date, NaiveDate::from_ymd_opt(1994, 9, 10));

    store.add(entry(13, "Forrest Gump")).await.unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&storage.raw(COLLECTION).unwrap()).unwrap();
    assert_eq!(raw["version"], 1);
    assert_eq!(raw["entries"].as_array().unwrap().len(), 2);
    assert_eq!(raw["entries"][0]["id"], 680);
}

#[tokio::test]
async fn test_failed_write_leaves_previous_state_authoritative() {
    let (store, storage) = memory_store();
    store.add(entry(1, "One")).await.unwrap();

    storage.set_fail_writes(true);
    let err = store.add(entry(2, "Two")).await.unwrap_err();
    assert!(err.is_write_failure());
    let err = store.remove(MovieId(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::Persistence { action: "write", .. }));

    assert_eq!(store.load().await.unwrap().ids(), vec![MovieId(1)]);

    storage.set_fail_writes(false);
    assert!(store.add(entry(2, "Two")).await.unwrap());
    assert_eq!(store.load().await.unwrap().ids(), vec![MovieId(1), MovieId(2)]);
}

#[tokio::test]
async fn test_unreadable_storage_is_not_treated_as_empty() {
    let store = WatchlistStore::new(COLLECTION, Arc::new(UnreadableStorage));
    assert!(matches!(
        store.load().await.unwrap_err(),
        StoreError::Persistence { action: "read", .. }
    ));
    assert!(store.add(entry(1, "One")).await.is_err());
}

#[tokio::test]
async fn test_clear_empties_collection() {
    let (store, _) = memory_store();
    store.add(entry(1, "One")).await.unwrap();
    store.add(entry(2, "Two")).await.unwrap();

    assert!(store.clear().await.unwrap());
    assert!(store.load().await.unwrap().is_empty());
    assert!(!store.clear().await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_are_not_lost() {
    let storage = Arc::new(InterleavingStorage { inner: MemorySnapshotStorage::new() });
    let store = WatchlistStore::new(COLLECTION, storage);

    let detail_screen = store.clone();
    let other_screen = store.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move { detail_screen.add(entry(100, "A")).await }),
        tokio::spawn(async move { other_screen.add(entry(200, "B")).await }),
    );
    assert!(a.unwrap().unwrap());
    assert!(b.unwrap().unwrap());

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.contains(MovieId(100)));
    assert!(loaded.contains(MovieId(200)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_mutations_match_a_serial_order() {
    let dir = TempDir::new().unwrap();
    let store = WatchlistStore::new(COLLECTION, Arc::new(FileSnapshotStorage::new(dir.path())));
    for id in 0..10 {
        store.add(entry(id, "seed")).await.unwrap();
    }

    // Remove the even seeds while adding 100..110; the two sets never collide
    let mut handles = Vec::new();
    for id in 0..10u64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            if id % 2 == 0 {
                store.remove(MovieId(id)).await
            } else {
                store.add(entry(100 + id, "new")).await
            }
        }));
    }
    for id in 0..10u64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.add(entry(200 + id, "more")).await }));
    }
    for result in futures::future::join_all(handles).await {
        assert!(result.unwrap().unwrap());
    }

    let loaded = store.load().await.unwrap();
    for id in 0..10u64 {
        assert_eq!(loaded.contains(MovieId(id)), id % 2 == 1, "seed {}", id);
        assert_eq!(loaded.contains(MovieId(100 + id)), id % 2 == 1, "added {}", 100 + id);
        assert!(loaded.contains(MovieId(200 + id)));
    }
    assert_eq!(loaded.len(), 20);
}

#[tokio::test]
async fn test_add_then_remove_on_separate_handles_serialize() {
    let (store, _) = memory_store();
    store.add(entry(1, "One")).await.unwrap();

    let detail = store.clone();
    let list = store.clone();
    let (added, removed) = tokio::join!(detail.add(entry(2, "Two")), list.remove(MovieId(1)));
    assert!(added.unwrap());
    assert!(removed.unwrap());

    assert_eq!(store.load().await.unwrap().ids(), vec![MovieId(2)]);
}

#[tokio::test]
async fn test_dropped_mutation_still_completes() {
    let gate = Arc::new(Semaphore::new(0));
    let storage = Arc::new(GatedStorage { inner: MemorySnapshotStorage::new(), gate: gate.clone() });
    let store = WatchlistStore::new(COLLECTION, storage);

    let abandoned = tokio::time::timeout(Duration::from_millis(20), store.add(entry(42, "Abandoned"))).await;
    assert!(abandoned.is_err());

    gate.add_permits(1);
    // load queues behind the in-flight add
    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.ids(), vec![MovieId(42)]);
}

#[tokio::test]
async fn test_file_backed_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileSnapshotStorage::new(dir.path()));
    let store = WatchlistStore::new(COLLECTION, storage.clone());

    let mut dated = entry(27205, "Inception");
    dated.release_date = NaiveDate::from_ymd_opt(2010, 7, 15);
    store.add(dated.clone()).await.unwrap();

    // A fresh handle over the same directory sees the persisted snapshot
    let reopened = WatchlistStore::new(COLLECTION, Arc::new(FileSnapshotStorage::new(dir.path())));
    assert_eq!(reopened.load().await.unwrap().entries(), &[dated]);
    assert!(storage.snapshot_path(COLLECTION).exists());
}

#[tokio::test]
async fn test_corrupt_file_is_backed_up_on_disk() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileSnapshotStorage::new(dir.path()));
    std::fs::write(storage.snapshot_path(COLLECTION), b"{\"version\": 1, \"entr").unwrap();
    let store = WatchlistStore::new(COLLECTION, storage.clone());

    assert!(store.load().await.unwrap().is_empty());
    assert_eq!(
        std::fs::read(storage.backup_path(COLLECTION)).unwrap(),
        b"{\"version\": 1, \"entr"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_separate_stores_over_one_directory_do_not_lose_updates() {
    let dir = TempDir::new().unwrap();

    for round in 0..20 {
        let collection = format!("shared{}", round);
        let first = WatchlistStore::new(collection.clone(), Arc::new(FileSnapshotStorage::new(dir.path())));
        let second = WatchlistStore::new(collection.clone(), Arc::new(FileSnapshotStorage::new(dir.path())));

        let a = tokio::spawn(async move { first.add(entry(1, "One")).await });
        let b = tokio::spawn(async move { second.add(entry(2, "Two")).await });
        assert!(a.await.unwrap().unwrap());
        assert!(b.await.unwrap().unwrap());

        let fresh = WatchlistStore::new(collection, Arc::new(FileSnapshotStorage::new(dir.path())));
        let mut ids = fresh.load().await.unwrap().ids();
        ids.sort_by_key(|id| id.0);
        assert_eq!(ids, vec![MovieId(1), MovieId(2)], "round {}", round);
    }
}

#[tokio::test]
async fn test_clear_over_corrupt_snapshot_reports_a_change() {
    let (store, storage) = memory_store();
    storage.put_raw(COLLECTION, b"{\"version\": 1, \"entries\": [".to_vec());

    assert!(store.clear().await.unwrap());
    assert!(storage.backup(COLLECTION).is_some());
    assert!(store.try_load().await.unwrap().is_empty());
    assert!(!store.clear().await.unwrap());
}

#[tokio::test]
async fn test_non_finite_rating_is_refused_without_touching_the_snapshot() {
    let (store, storage) = memory_store();
    store.add(entry(1, "One")).await.unwrap();
    let before = storage.raw(COLLECTION);

    let mut bad = entry(2, "Two");
    bad.vote_average = f64::INFINITY;
    let err = store.add(bad).await.unwrap_err();
    assert!(matches!(err, StoreError::Encode { .. }));
    assert!(err.is_write_failure());

    assert_eq!(storage.raw(COLLECTION), before);
    assert_eq!(store.try_load().await.unwrap().ids(), vec![MovieId(1)]);
}
