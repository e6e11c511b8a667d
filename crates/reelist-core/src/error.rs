use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted snapshot exists but cannot be decoded.
    #[error("watchlist snapshot '{collection}' is corrupt: {reason}")]
    CorruptState { collection: String, reason: String },

    /// Durable storage could not be read, locked or written. `action` names which.
    #[error("failed to {action} watchlist snapshot '{collection}': {source}")]
    Persistence {
        collection: String,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode watchlist snapshot '{collection}': {source}")]
    Encode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    /// The worker running a mutation was torn down before reporting back.
    #[error("watchlist operation on '{collection}' was interrupted: {reason}")]
    Interrupted { collection: String, reason: String },
}

impl StoreError {
    pub fn is_corrupt_state(&self) -> bool {
        matches!(self, StoreError::CorruptState { .. })
    }

    /// A mutation stopped before replacing the snapshot; it did not happen and may be retried.
    pub fn is_write_failure(&self) -> bool {
        match self {
            StoreError::Persistence { action, .. } => *action != "read",
            StoreError::Encode { .. } | StoreError::Interrupted { .. } => true,
            StoreError::CorruptState { .. } => false,
        }
    }
}
