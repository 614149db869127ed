//! In-process document store with optimistic-concurrency transactions.
//!
//! Documents live in versioned collections. A session buffers its writes and
//! records the version of everything it reads; `commit` serialises through a
//! single mutex, re-verifies every conditional guard and every observed
//! version against committed state, and only then applies the buffer. The
//! first committer wins; the second observes either a failed guard
//! (`ConditionFailed`) or an advanced version (`WriteConflict`).

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use gigdesk_common::{Bid, BidId, BidStatus, Gig, GigId, GigStatus, User, UserId};

use crate::document::Versioned;
use crate::error::{Result, StoreError};
use crate::traits::{DocumentStore, GigPatch, GigQuery, StoreSession};

/// Shared collections behind the store handle.
struct Collections {
    gigs: DashMap<GigId, Versioned<Gig>>,
    bids: DashMap<BidId, Versioned<Bid>>,
    users: DashMap<UserId, Versioned<User>>,
    /// Bid ids per gig, in insertion order.
    bids_by_gig: DashMap<GigId, Vec<BidId>>,
    /// Uniqueness index: one bid per (gig, freelancer).
    bid_index: DashMap<(GigId, UserId), BidId>,
    /// Serialises commit validation and apply.
    commit_lock: Mutex<()>,
}

/// The in-memory document store.
#[derive(Clone)]
pub struct MemoryStore {
    collections: Arc<Collections>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(Collections {
                gigs: DashMap::new(),
                bids: DashMap::new(),
                users: DashMap::new(),
                bids_by_gig: DashMap::new(),
                bid_index: DashMap::new(),
                commit_lock: Mutex::new(()),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// What a session observed: a document id and the version it had at read
/// time (`None` if the document was absent).
#[derive(Debug, Clone, Copy)]
enum ReadRecord {
    Gig(GigId, Option<u64>),
    Bid(BidId, Option<u64>),
    User(UserId, Option<u64>),
}

/// A buffered write.
enum Write {
    InsertUser(User),
    InsertGig(Gig),
    InsertBid(Bid),
    PatchGig { id: GigId, patch: GigPatch },
    AssignGig { id: GigId, freelancer: UserId },
    SetBidStatus { id: BidId, status: BidStatus },
    DeleteGig(GigId),
}

/// A transaction over the [`MemoryStore`].
pub struct MemorySession {
    collections: Arc<Collections>,
    reads: Vec<ReadRecord>,
    writes: Vec<Write>,
}

impl MemorySession {
    fn read_gig(&mut self, id: GigId) -> Option<Gig> {
        let entry = self.collections.gigs.get(&id);
        self.reads
            .push(ReadRecord::Gig(id, entry.as_ref().map(|e| e.version)));
        entry.map(|e| e.doc.clone())
    }

    fn read_bid(&mut self, id: BidId) -> Option<Bid> {
        let entry = self.collections.bids.get(&id);
        self.reads
            .push(ReadRecord::Bid(id, entry.as_ref().map(|e| e.version)));
        entry.map(|e| e.doc.clone())
    }

    fn read_user(&mut self, id: UserId) -> Option<User> {
        let entry = self.collections.users.get(&id);
        self.reads
            .push(ReadRecord::User(id, entry.as_ref().map(|e| e.version)));
        entry.map(|e| e.doc.clone())
    }
}

impl StoreSession for MemorySession {
    fn gig(&mut self, id: GigId) -> Result<Option<Gig>> {
        Ok(self.read_gig(id))
    }

    fn bid(&mut self, id: BidId) -> Result<Option<Bid>> {
        Ok(self.read_bid(id))
    }

    fn user(&mut self, id: UserId) -> Result<Option<User>> {
        Ok(self.read_user(id))
    }

    fn bids_for_gig(&mut self, gig_id: GigId) -> Result<Vec<Bid>> {
        let ids: Vec<BidId> = self
            .collections
            .bids_by_gig
            .get(&gig_id)
            .map(|e| e.clone())
            .unwrap_or_default();
        Ok(ids.into_iter().filter_map(|id| self.read_bid(id)).collect())
    }

    fn insert_user(&mut self, user: User) -> Result<()> {
        self.writes.push(Write::InsertUser(user));
        Ok(())
    }

    fn insert_gig(&mut self, gig: Gig) -> Result<()> {
        self.writes.push(Write::InsertGig(gig));
        Ok(())
    }

    fn insert_bid(&mut self, bid: Bid) -> Result<()> {
        self.writes.push(Write::InsertBid(bid));
        Ok(())
    }

    fn update_gig_fields(&mut self, id: GigId, patch: GigPatch) -> Result<u64> {
        if self.read_gig(id).is_none() {
            return Ok(0);
        }
        self.writes.push(Write::PatchGig { id, patch });
        Ok(1)
    }

    fn assign_gig_if_open(&mut self, id: GigId, freelancer: UserId) -> Result<u64> {
        // Matched count against the snapshot; the Open guard is checked
        // again at commit against committed state.
        match self.read_gig(id) {
            Some(gig) if gig.status == GigStatus::Open => {
                self.writes.push(Write::AssignGig { id, freelancer });
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    fn set_bid_status(&mut self, id: BidId, status: BidStatus) -> Result<u64> {
        if self.read_bid(id).is_none() {
            return Ok(0);
        }
        self.writes.push(Write::SetBidStatus { id, status });
        Ok(1)
    }

    fn reject_pending_bids(&mut self, gig_id: GigId, except: BidId) -> Result<Vec<Bid>> {
        let bids = self.bids_for_gig(gig_id)?;
        let mut rejected = Vec::new();
        for bid in bids {
            if bid.id == except || bid.status != BidStatus::Pending {
                continue;
            }
            self.writes.push(Write::SetBidStatus {
                id: bid.id,
                status: BidStatus::Rejected,
            });
            rejected.push(bid);
        }
        Ok(rejected)
    }

    fn delete_gig(&mut self, id: GigId) -> Result<u64> {
        if self.read_gig(id).is_none() {
            return Ok(0);
        }
        self.writes.push(Write::DeleteGig(id));
        Ok(1)
    }

    fn commit(self) -> Result<()> {
        let collections = self.collections.clone();
        collections.commit(self.reads, self.writes)
    }

    fn abort(self) {
        // Writes were only buffered; dropping the session discards them.
        debug!(
            buffered_writes = self.writes.len(),
            "Transaction aborted, buffer discarded"
        );
    }
}

impl Collections {
    fn commit(&self, reads: Vec<ReadRecord>, writes: Vec<Write>) -> Result<()> {
        let _guard = self.commit_lock.lock();

        // Re-verify conditional guards and insert uniqueness against
        // committed state, independent of the session's earlier reads.
        // Guard failures outrank version conflicts: a hire that lost the
        // gig race reports "already assigned", not a generic conflict.
        for write in &writes {
            match write {
                Write::AssignGig { id, .. } => {
                    let open = self
                        .gigs
                        .get(id)
                        .map(|e| e.doc.status == GigStatus::Open)
                        .unwrap_or(false);
                    if !open {
                        return Err(StoreError::ConditionFailed);
                    }
                }
                Write::InsertBid(bid) => {
                    if self
                        .bid_index
                        .contains_key(&(bid.gig_id, bid.freelancer_id))
                    {
                        return Err(StoreError::DuplicateBid);
                    }
                    if !self.gigs.contains_key(&bid.gig_id) {
                        return Err(StoreError::WriteConflict);
                    }
                }
                Write::PatchGig { id, .. } | Write::DeleteGig(id) => {
                    if !self.gigs.contains_key(id) {
                        return Err(StoreError::WriteConflict);
                    }
                }
                Write::SetBidStatus { id, .. } => {
                    if !self.bids.contains_key(id) {
                        return Err(StoreError::WriteConflict);
                    }
                }
                Write::InsertUser(_) | Write::InsertGig(_) => {}
            }
        }

        // Validate the read set: every document this transaction observed
        // must still be at the observed version. This is what makes a bid
        // insert racing a hire fail cleanly in either commit order, since
        // both transactions read (and the hire writes) the parent gig.
        for read in &reads {
            let unchanged = match read {
                ReadRecord::Gig(id, v) => self.gigs.get(id).map(|e| e.version) == *v,
                ReadRecord::Bid(id, v) => self.bids.get(id).map(|e| e.version) == *v,
                ReadRecord::User(id, v) => self.users.get(id).map(|e| e.version) == *v,
            };
            if !unchanged {
                return Err(StoreError::WriteConflict);
            }
        }

        // Apply. Presence of every target was validated above, so the
        // lookups below cannot miss while the commit lock is held.
        for write in writes {
            match write {
                Write::InsertUser(user) => {
                    self.users.insert(user.id, Versioned::new(user));
                }
                Write::InsertGig(gig) => {
                    self.gigs.insert(gig.id, Versioned::new(gig));
                }
                Write::InsertBid(bid) => {
                    self.bid_index
                        .insert((bid.gig_id, bid.freelancer_id), bid.id);
                    self.bids_by_gig
                        .entry(bid.gig_id)
                        .or_default()
                        .push(bid.id);
                    // Touch the parent gig so concurrent transactions that
                    // read it (a hire in flight) fail validation.
                    if let Some(mut gig) = self.gigs.get_mut(&bid.gig_id) {
                        gig.touch();
                    }
                    self.bids.insert(bid.id, Versioned::new(bid));
                }
                Write::PatchGig { id, patch } => {
                    let mut entry = self
                        .gigs
                        .get_mut(&id)
                        .ok_or_else(|| StoreError::Internal("gig vanished during apply".into()))?;
                    if let Some(title) = patch.title {
                        entry.doc.title = title;
                    }
                    if let Some(description) = patch.description {
                        entry.doc.description = description;
                    }
                    if let Some(budget) = patch.budget {
                        entry.doc.budget = budget;
                    }
                    entry.doc.updated_at = Utc::now();
                    entry.touch();
                }
                Write::AssignGig { id, freelancer } => {
                    let mut entry = self
                        .gigs
                        .get_mut(&id)
                        .ok_or_else(|| StoreError::Internal("gig vanished during apply".into()))?;
                    entry
                        .doc
                        .assign(freelancer)
                        .map_err(|e| StoreError::Internal(e.to_string()))?;
                    entry.touch();
                }
                Write::SetBidStatus { id, status } => {
                    let mut entry = self
                        .bids
                        .get_mut(&id)
                        .ok_or_else(|| StoreError::Internal("bid vanished during apply".into()))?;
                    entry
                        .doc
                        .transition_to(status)
                        .map_err(|e| StoreError::Internal(e.to_string()))?;
                    entry.touch();
                }
                Write::DeleteGig(id) => {
                    self.gigs.remove(&id);
                }
            }
        }

        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    type Session = MemorySession;

    fn begin(&self) -> MemorySession {
        MemorySession {
            collections: self.collections.clone(),
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    fn get_gig(&self, id: GigId) -> Option<Gig> {
        self.collections.gigs.get(&id).map(|e| e.doc.clone())
    }

    fn get_bid(&self, id: BidId) -> Option<Bid> {
        self.collections.bids.get(&id).map(|e| e.doc.clone())
    }

    fn get_user(&self, id: UserId) -> Option<User> {
        self.collections.users.get(&id).map(|e| e.doc.clone())
    }

    fn list_gigs(&self, query: &GigQuery) -> Vec<Gig> {
        let search = query.title_search.as_ref().map(|s| s.to_lowercase());
        let mut gigs: Vec<Gig> = self
            .collections
            .gigs
            .iter()
            .map(|e| e.doc.clone())
            .filter(|g| query.status.map_or(true, |s| g.status == s))
            .filter(|g| {
                search
                    .as_ref()
                    .map_or(true, |s| g.title.to_lowercase().contains(s))
            })
            .collect();
        gigs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        gigs
    }

    fn gigs_by_owner(&self, owner: UserId) -> Vec<Gig> {
        let mut gigs: Vec<Gig> = self
            .collections
            .gigs
            .iter()
            .map(|e| e.doc.clone())
            .filter(|g| g.owner_id == owner)
            .collect();
        gigs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        gigs
    }

    fn bids_by_freelancer(&self, freelancer: UserId) -> Vec<Bid> {
        let mut bids: Vec<Bid> = self
            .collections
            .bids
            .iter()
            .map(|e| e.doc.clone())
            .filter(|b| b.freelancer_id == freelancer)
            .collect();
        bids.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bids
    }
}
