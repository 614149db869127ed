//! Store traits: the seam between the coordinator and any concrete store.
//!
//! The hire coordinator's contract is store-agnostic; any backend offering
//! snapshot transactions, guarded (compare-and-set) updates re-verified at
//! commit, and write-conflict rejection of the second committer can sit
//! behind these traits.

use gigdesk_common::{Bid, BidId, BidStatus, Gig, GigId, GigStatus, User, UserId};
use rust_decimal::Decimal;

use crate::error::Result;

/// Owner-editable gig fields, applied only while the gig is open.
#[derive(Debug, Clone, Default)]
pub struct GigPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<Decimal>,
}

impl GigPatch {
    /// Check whether the patch changes anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.budget.is_none()
    }
}

/// Listing filter for gigs.
#[derive(Debug, Clone, Default)]
pub struct GigQuery {
    /// Restrict to a status; `None` returns all.
    pub status: Option<GigStatus>,
    /// Case-insensitive substring match on the title.
    pub title_search: Option<String>,
}

/// A document store with transactional sessions.
pub trait DocumentStore: Send + Sync + 'static {
    type Session: StoreSession;

    /// Begin a snapshot transaction.
    fn begin(&self) -> Self::Session;

    // Read-only snapshot queries, outside any transaction.

    /// Fetch a gig by id.
    fn get_gig(&self, id: GigId) -> Option<Gig>;

    /// Fetch a bid by id.
    fn get_bid(&self, id: BidId) -> Option<Bid>;

    /// Fetch a user by id.
    fn get_user(&self, id: UserId) -> Option<User>;

    /// List gigs matching a filter, newest first.
    fn list_gigs(&self, query: &GigQuery) -> Vec<Gig>;

    /// List gigs posted by an owner, newest first.
    fn gigs_by_owner(&self, owner: UserId) -> Vec<Gig>;

    /// List bids submitted by a freelancer, newest first.
    fn bids_by_freelancer(&self, freelancer: UserId) -> Vec<Bid>;
}

/// A transaction over the store.
///
/// Reads record the observed document versions; writes are buffered and
/// become visible only when [`commit`](StoreSession::commit) succeeds.
/// Dropping the session (or calling [`abort`](StoreSession::abort)) discards
/// the buffer; no partial write is ever visible to readers.
pub trait StoreSession: Send {
    /// Read a gig inside the transaction.
    fn gig(&mut self, id: GigId) -> Result<Option<Gig>>;

    /// Read a bid inside the transaction.
    fn bid(&mut self, id: BidId) -> Result<Option<Bid>>;

    /// Read a user inside the transaction.
    fn user(&mut self, id: UserId) -> Result<Option<User>>;

    /// Read all bids for a gig inside the transaction.
    fn bids_for_gig(&mut self, gig_id: GigId) -> Result<Vec<Bid>>;

    /// Buffer a user insert.
    fn insert_user(&mut self, user: User) -> Result<()>;

    /// Buffer a gig insert.
    fn insert_gig(&mut self, gig: Gig) -> Result<()>;

    /// Buffer a bid insert. The one-bid-per-freelancer-per-gig index is
    /// enforced at commit; the insert also invalidates concurrent
    /// transactions that read the parent gig.
    fn insert_bid(&mut self, bid: Bid) -> Result<()>;

    /// Buffer an update of owner-editable gig fields.
    /// Returns the matched count (0 if the gig is absent in the snapshot).
    fn update_gig_fields(&mut self, id: GigId, patch: GigPatch) -> Result<u64>;

    /// Buffer the conditional assignment of a gig, guarded by
    /// `status == Open`. Returns the matched count against the snapshot;
    /// the guard is re-verified against committed state at commit time,
    /// independent of any earlier read.
    fn assign_gig_if_open(&mut self, id: GigId, freelancer: UserId) -> Result<u64>;

    /// Buffer a bid status change. Returns the matched count.
    fn set_bid_status(&mut self, id: BidId, status: BidStatus) -> Result<u64>;

    /// Buffer rejection of every still-pending bid on a gig except the given
    /// one. Returns the bids that will be rejected, as observed in the
    /// snapshot.
    fn reject_pending_bids(&mut self, gig_id: GigId, except: BidId) -> Result<Vec<Bid>>;

    /// Buffer a gig delete. Returns the matched count.
    fn delete_gig(&mut self, id: GigId) -> Result<u64>;

    /// Atomically validate and apply all buffered writes.
    ///
    /// Fails with [`StoreError::WriteConflict`](crate::StoreError) if any
    /// document this transaction observed has advanced, or with
    /// [`StoreError::ConditionFailed`](crate::StoreError) if a conditional
    /// guard no longer holds. On failure nothing is applied.
    fn commit(self) -> Result<()>;

    /// Discard all buffered writes.
    fn abort(self);
}
