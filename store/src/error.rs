//! Error types for the document store.

use thiserror::Error;

/// Store-level failure modes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another transaction advanced a document this transaction read or
    /// wrote; the commit lost and nothing was applied.
    #[error("Write conflict: a concurrent transaction touched the same documents")]
    WriteConflict,

    /// A conditional update's guard no longer held at commit time; the
    /// write matched zero documents and nothing was applied.
    #[error("Condition failed: guarded update matched no documents")]
    ConditionFailed,

    /// A bid insert violated the one-bid-per-freelancer-per-gig index.
    #[error("Duplicate bid for this gig and freelancer")]
    DuplicateBid,

    /// Internal store failure.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Check if the caller may retry the whole transaction.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::WriteConflict)
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
