use thiserror::Error;

/// Failures the store cannot recover from locally.
///
/// Validation failures, missing sessions, and corrupt persisted blobs are
/// all handled as values; only the storage backend itself can surface an
/// error to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed to read or write a key.
    #[error("storage backend failure: {0}")]
    Storage(#[from] std::io::Error),

    /// The in-memory state could not be serialized for persistence.
    #[error("state serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
