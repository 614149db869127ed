//! GigDesk Document Store
//!
//! Versioned in-process collections for gigs, bids, and users, with snapshot
//! transactions, guarded compare-and-set updates re-verified at commit, and
//! first-committer-wins write-conflict detection. The coordinator talks to
//! the store through the [`DocumentStore`] / [`StoreSession`] traits and
//! never relies on in-process locking of its own.

pub mod document;
pub mod error;
pub mod memory;
pub mod traits;

pub use document::Versioned;
pub use error::{Result, StoreError};
pub use memory::{MemorySession, MemoryStore};
pub use traits::{DocumentStore, GigPatch, GigQuery, StoreSession};
