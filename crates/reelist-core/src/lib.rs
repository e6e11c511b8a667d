pub mod controllers;
pub mod error;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use controllers::{DetailController, DetailError, DetailState, HomeController, ListState, SearchController, SearchState, WatchlistController};
pub use error::StoreError;
pub use snapshot::{DecodedSnapshot, SNAPSHOT_VERSION};
pub use storage::{CollectionLock, FileSnapshotStorage, MemorySnapshotStorage, SnapshotStorage};
pub use store::WatchlistStore;
