//! Marketplace CRUD operations: users, gigs, and bids.
//!
//! Everything that mutates goes through a store transaction; listings are
//! snapshot reads. Ownership and state checks happen in-session so they are
//! validated again at commit.

use std::sync::Arc;

use serde::Deserialize;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use gigdesk_common::{
    validate, Bid, BidId, Gig, GigId, GigStatus, MarketError, Result, User, UserId,
};
use gigdesk_store::{DocumentStore, GigPatch, GigQuery, StoreSession};

use crate::coordinator::store_err;
use crate::metrics::Metrics;
use crate::notifier::{Notification, Notifier};

/// Input for creating a gig.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGig {
    pub title: String,
    pub description: String,
    pub budget: Decimal,
}

/// Input for placing a bid.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBid {
    pub gig_id: GigId,
    pub price: Decimal,
    pub message: String,
}

/// Marketplace operations over a document store.
pub struct Marketplace<S: DocumentStore> {
    store: Arc<S>,
    notifier: Arc<Notifier>,
    metrics: Arc<Metrics>,
}

impl<S: DocumentStore> Marketplace<S> {
    /// Create a new marketplace service.
    pub fn new(store: Arc<S>, notifier: Arc<Notifier>, metrics: Arc<Metrics>) -> Self {
        Self {
            store,
            notifier,
            metrics,
        }
    }

    /// Register a user.
    pub async fn register_user(&self, name: &str, email: &str) -> Result<User> {
        if name.trim().is_empty() {
            return Err(MarketError::validation("Name is required", "name"));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(MarketError::validation("A valid email is required", "email"));
        }

        let user = User::new(name.trim(), email.trim());
        let mut txn = self.store.begin();
        txn.insert_user(user.clone()).map_err(store_err)?;
        txn.commit().map_err(store_err)?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Post a new gig.
    #[instrument(skip(self, new_gig), fields(owner_id = %owner_id))]
    pub async fn create_gig(&self, owner_id: UserId, new_gig: NewGig) -> Result<Gig> {
        validate::gig_title(&new_gig.title)?;
        validate::gig_description(&new_gig.description)?;
        validate::gig_budget(new_gig.budget)?;

        let mut txn = self.store.begin();
        if txn.user(owner_id).map_err(store_err)?.is_none() {
            txn.abort();
            return Err(MarketError::UserNotFound(owner_id));
        }

        let gig = Gig::new(
            owner_id,
            new_gig.title.trim(),
            new_gig.description.trim(),
            new_gig.budget,
        );
        txn.insert_gig(gig.clone()).map_err(store_err)?;
        txn.commit().map_err(store_err)?;

        self.metrics.gig_created();
        info!(gig_id = %gig.id, "Gig created");
        Ok(gig)
    }

    /// Update an open gig's owner-editable fields.
    #[instrument(skip(self, patch), fields(gig_id = %gig_id, acting_user = %acting_user))]
    pub async fn update_gig(
        &self,
        acting_user: UserId,
        gig_id: GigId,
        patch: GigPatch,
    ) -> Result<Gig> {
        if let Some(title) = &patch.title {
            validate::gig_title(title)?;
        }
        if let Some(description) = &patch.description {
            validate::gig_description(description)?;
        }
        if let Some(budget) = patch.budget {
            validate::gig_budget(budget)?;
        }

        let mut txn = self.store.begin();
        let Some(gig) = txn.gig(gig_id).map_err(store_err)? else {
            txn.abort();
            return Err(MarketError::GigNotFound(gig_id));
        };

        if gig.owner_id != acting_user {
            txn.abort();
            return Err(MarketError::forbidden("Not authorized to update this gig"));
        }

        if gig.status != GigStatus::Open {
            txn.abort();
            return Err(MarketError::GigAssigned);
        }

        txn.update_gig_fields(gig_id, patch).map_err(store_err)?;
        txn.commit().map_err(store_err)?;

        self.store
            .get_gig(gig_id)
            .ok_or(MarketError::GigNotFound(gig_id))
    }

    /// Delete a gig. Owner only; allowed even once assigned (administrative
    /// removal).
    #[instrument(skip(self), fields(gig_id = %gig_id, acting_user = %acting_user))]
    pub async fn delete_gig(&self, acting_user: UserId, gig_id: GigId) -> Result<()> {
        let mut txn = self.store.begin();
        let Some(gig) = txn.gig(gig_id).map_err(store_err)? else {
            txn.abort();
            return Err(MarketError::GigNotFound(gig_id));
        };

        if gig.owner_id != acting_user {
            txn.abort();
            return Err(MarketError::forbidden("Not authorized to delete this gig"));
        }

        txn.delete_gig(gig_id).map_err(store_err)?;
        txn.commit().map_err(store_err)?;

        info!(gig_id = %gig_id, "Gig deleted");
        Ok(())
    }

    /// Fetch a single gig.
    pub fn gig(&self, gig_id: GigId) -> Result<Gig> {
        self.store
            .get_gig(gig_id)
            .ok_or(MarketError::GigNotFound(gig_id))
    }

    /// List gigs matching a filter, newest first.
    pub fn list_gigs(&self, query: &GigQuery) -> Vec<Gig> {
        self.store.list_gigs(query)
    }

    /// List gigs posted by a user, newest first.
    pub fn gigs_by_owner(&self, owner_id: UserId) -> Vec<Gig> {
        self.store.gigs_by_owner(owner_id)
    }

    /// Submit a bid on an open gig.
    ///
    /// Rejected when the gig is closed, owned by the bidder, or already has
    /// a bid from this freelancer. The uniqueness index catches a duplicate
    /// racing in concurrently even if the in-session check passed.
    #[instrument(skip(self, new_bid), fields(freelancer_id = %freelancer_id, gig_id = %new_bid.gig_id))]
    pub async fn place_bid(&self, freelancer_id: UserId, new_bid: NewBid) -> Result<Bid> {
        validate::bid_message(&new_bid.message)?;
        validate::bid_price(new_bid.price)?;

        let mut txn = self.store.begin();

        let Some(freelancer) = txn.user(freelancer_id).map_err(store_err)? else {
            txn.abort();
            return Err(MarketError::UserNotFound(freelancer_id));
        };

        let Some(gig) = txn.gig(new_bid.gig_id).map_err(store_err)? else {
            txn.abort();
            return Err(MarketError::GigNotFound(new_bid.gig_id));
        };

        if gig.status != GigStatus::Open {
            txn.abort();
            return Err(MarketError::GigNotOpen);
        }

        if gig.owner_id == freelancer_id {
            txn.abort();
            return Err(MarketError::OwnGig);
        }

        let already_bid = txn
            .bids_for_gig(gig.id)
            .map_err(store_err)?
            .iter()
            .any(|b| b.freelancer_id == freelancer_id);
        if already_bid {
            txn.abort();
            return Err(MarketError::DuplicateBid);
        }

        let bid = Bid::new(
            gig.id,
            freelancer_id,
            new_bid.price,
            new_bid.message.trim(),
        );
        txn.insert_bid(bid.clone()).map_err(store_err)?;
        txn.commit().map_err(store_err)?;

        self.metrics.bid_placed();
        info!(bid_id = %bid.id, gig_id = %gig.id, "Bid placed");

        // Best-effort heads-up to the gig owner.
        let delivered = self.notifier.publish(
            &gig.owner_id,
            Notification::NewBid {
                gig_id: gig.id,
                gig_title: gig.title.clone(),
                bid_id: bid.id,
                price: bid.price,
                freelancer_name: freelancer.name,
            },
        );
        self.metrics.notification(delivered);

        Ok(bid)
    }

    /// List bids for a gig. Owner only.
    pub fn bids_for_gig(&self, acting_user: UserId, gig_id: GigId) -> Result<Vec<Bid>> {
        let mut txn = self.store.begin();
        let Some(gig) = txn.gig(gig_id).map_err(store_err)? else {
            txn.abort();
            return Err(MarketError::GigNotFound(gig_id));
        };

        if gig.owner_id != acting_user {
            txn.abort();
            return Err(MarketError::forbidden(
                "Not authorized to view bids for this gig",
            ));
        }

        let mut bids = txn.bids_for_gig(gig_id).map_err(store_err)?;
        txn.abort();

        bids.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bids)
    }

    /// List a freelancer's own bids, newest first.
    pub fn bids_by_freelancer(&self, freelancer_id: UserId) -> Vec<Bid> {
        self.store.bids_by_freelancer(freelancer_id)
    }

    /// Fetch a single bid.
    pub fn bid(&self, bid_id: BidId) -> Result<Bid> {
        self.store
            .get_bid(bid_id)
            .ok_or(MarketError::BidNotFound(bid_id))
    }
}
