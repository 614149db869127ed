//! Versioned document wrapper.

/// A document together with its optimistic-concurrency version.
///
/// Every committed write bumps the version; commit validation compares the
/// version a transaction observed against the version currently committed.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    /// The document payload.
    pub doc: T,
    /// Monotonic per-document version, starting at 1 on insert.
    pub version: u64,
}

impl<T> Versioned<T> {
    /// Wrap a freshly inserted document.
    pub fn new(doc: T) -> Self {
        Self { doc, version: 1 }
    }

    /// Replace the payload and advance the version.
    pub fn update(&mut self, doc: T) {
        self.doc = doc;
        self.version += 1;
    }

    /// Advance the version without changing the payload.
    ///
    /// Used when a logically related write (a bid insert touching its parent
    /// gig) must invalidate concurrent readers of this document.
    pub fn touch(&mut self) {
        self.version += 1;
    }
}
