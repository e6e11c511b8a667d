use async_trait::async_trait;
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Byte-level home of named snapshots.
///
/// Implementations only move whole snapshots: `write` must either replace the
/// previous bytes entirely or leave them untouched.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// `Ok(None)` when nothing has been persisted under `collection` yet.
    async fn read(&self, collection: &str) -> io::Result<Option<Vec<u8>>>;

    async fn write(&self, collection: &str, bytes: &[u8]) -> io::Result<()>;

    /// Keep a copy of undecodable bytes before they get overwritten.
    async fn backup_corrupt(&self, collection: &str, bytes: &[u8]) -> io::Result<()>;

    /// Exclusive hold on `collection` against other handles to the same
    /// backing data, released when the guard drops.
    ///
    /// Backends that cannot be shared outside one store need nothing here.
    async fn lock(&self, _collection: &str) -> io::Result<CollectionLock> {
        Ok(CollectionLock::default())
    }
}

/// Guard returned by [`SnapshotStorage::lock`].
#[derive(Debug, Default)]
pub struct CollectionLock {
    file: Option<File>,
}

impl Drop for CollectionLock {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            if let Err(e) = FileExt::unlock(file) {
                warn!("Failed to release snapshot lock: {}", e);
            }
        }
    }
}

/// One JSON file per collection under a directory.
///
/// Several processes may point at the same directory; mutations are ordered
/// through an advisory lock on `<collection>.lock`.
#[derive(Debug, Clone)]
pub struct FileSnapshotStorage {
    dir: PathBuf,
}

impl FileSnapshotStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }

    pub fn backup_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json.bak", collection))
    }

    pub fn lock_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", collection))
    }
}

fn join_error(e: tokio::task::JoinError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

#[async_trait]
impl SnapshotStorage for FileSnapshotStorage {
    async fn read(&self, collection: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.snapshot_path(collection);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Read snapshot {:?} ({} bytes)", path, bytes.len());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Snapshot miss: {:?} (file does not exist)", path);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn write(&self, collection: &str, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Atomic write: private temp file in the same directory, then rename
        let dir = self.dir.clone();
        let path = self.snapshot_path(collection);
        let prefix = format!("{}.json.", collection);
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let mut temp = tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(".tmp")
                .tempfile_in(&dir)?;
            temp.write_all(&bytes)?;
            temp.as_file().sync_all()?;
            temp.persist(&path).map_err(|e| {
                warn!("Failed to move snapshot into place at {:?}: {}", path, e.error);
                e.error
            })?;
            debug!("Wrote snapshot {:?} ({} bytes)", path, bytes.len());
            Ok(())
        })
        .await
        .map_err(join_error)?
    }

    async fn backup_corrupt(&self, collection: &str, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.backup_path(collection), bytes).await
    }

    async fn lock(&self, collection: &str) -> io::Result<CollectionLock> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.lock_path(collection);
        let file = tokio::task::spawn_blocking(move || -> io::Result<File> {
            let file = std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)?;
            if file.try_lock_exclusive().is_err() {
                debug!("Waiting for snapshot lock {:?}", path);
                file.lock_exclusive()?;
            }
            Ok(file)
        })
        .await
        .map_err(join_error)??;
        Ok(CollectionLock { file: Some(file) })
    }
}

/// In-process storage with write-failure injection.
#[derive(Debug, Default)]
pub struct MemorySnapshotStorage {
    snapshots: Mutex<HashMap<String, Vec<u8>>>,
    backups: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw bytes, bypassing any store.
    pub fn put_raw(&self, collection: &str, bytes: impl Into<Vec<u8>>) {
        lock(&self.snapshots).insert(collection.to_string(), bytes.into());
    }

    pub fn raw(&self, collection: &str) -> Option<Vec<u8>> {
        lock(&self.snapshots).get(collection).cloned()
    }

    pub fn backup(&self, collection: &str) -> Option<Vec<u8>> {
        lock(&self.backups).get(collection).cloned()
    }

    /// Make every subsequent `write` fail until switched off again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    // The maps stay consistent even if a holder panicked
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl SnapshotStorage for MemorySnapshotStorage {
    async fn read(&self, collection: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.raw(collection))
    }

    async fn write(&self, collection: &str, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "injected write failure"));
        }
        self.put_raw(collection, bytes.to_vec());
        Ok(())
    }

    async fn backup_corrupt(&self, collection: &str, bytes: &[u8]) -> io::Result<()> {
        lock(&self.backups).insert(collection.to_string(), bytes.to_vec());
        Ok(())
    }
}
