//! The hire coordinator.
//!
//! Executes "accept a bid" atomically against concurrent competing hire
//! attempts on the same gig, then fans out notifications to affected users.
//!
//! The coordinator holds no locks of its own: correctness rests entirely on
//! the store's transactional guarantees, so any number of coordinator
//! instances can run against the same store. First writer wins; the losing
//! writer always receives a conflict-class error, never a silent no-op.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use gigdesk_common::{Bid, BidId, BidStatus, Gig, GigStatus, MarketError, Result, UserId};
use gigdesk_store::{DocumentStore, StoreError, StoreSession};

use crate::metrics::Metrics;
use crate::notifier::{Notification, Notifier};

/// Result of a successful hire.
#[derive(Debug, Clone)]
pub struct HireOutcome {
    /// The gig, now assigned.
    pub gig: Gig,
    /// The winning bid, now hired.
    pub bid: Bid,
    /// Competing bids rejected by this call.
    pub rejected: Vec<Bid>,
    /// Owner display name, captured in-transaction for the hired event.
    pub owner_name: String,
}

/// Orchestrates the hire transaction over a document store.
pub struct HireCoordinator<S: DocumentStore> {
    store: Arc<S>,
    notifier: Arc<Notifier>,
    metrics: Arc<Metrics>,
}

impl<S: DocumentStore> HireCoordinator<S> {
    /// Create a new coordinator.
    pub fn new(store: Arc<S>, notifier: Arc<Notifier>, metrics: Arc<Metrics>) -> Self {
        Self {
            store,
            notifier,
            metrics,
        }
    }

    /// Hire the freelancer behind `bid_id` on behalf of `acting_user`.
    ///
    /// Inside a single transaction: verify the bid and its gig exist, the
    /// acting user owns the gig, the gig is still open, and the bid is still
    /// pending; then assign the gig (guarded on `status == Open`), mark the
    /// bid hired, and reject every other pending bid. Exactly one of any set
    /// of concurrent calls on the same gig commits; the rest fail with a
    /// conflict. The coordinator never auto-retries a lost commit.
    ///
    /// Notifications go out only after the commit succeeds and are
    /// best-effort; their failure is invisible to the caller.
    #[instrument(skip(self), fields(acting_user = %acting_user, bid_id = %bid_id))]
    pub async fn hire(&self, acting_user: UserId, bid_id: BidId) -> Result<HireOutcome> {
        self.metrics.hire_attempted();

        let result = self.run_hire_transaction(acting_user, bid_id);
        match &result {
            Ok(outcome) => {
                self.metrics.hire_succeeded();
                info!(
                    gig_id = %outcome.gig.id,
                    freelancer_id = %outcome.bid.freelancer_id,
                    rejected = outcome.rejected.len(),
                    "Freelancer hired"
                );
            }
            Err(e) if e.http_status() == 409 => {
                self.metrics.hire_conflicted();
                info!(error = %e, "Hire lost the race");
            }
            Err(e) => {
                self.metrics.hire_rejected();
                warn!(error = %e, "Hire rejected");
            }
        }

        let outcome = result?;
        self.fan_out(&outcome);
        Ok(outcome)
    }

    /// The transactional part of a hire. Every error path aborts with zero
    /// visible writes.
    fn run_hire_transaction(&self, acting_user: UserId, bid_id: BidId) -> Result<HireOutcome> {
        let mut txn = self.store.begin();

        let Some(bid) = txn.bid(bid_id).map_err(store_err)? else {
            txn.abort();
            return Err(MarketError::BidNotFound(bid_id));
        };

        let Some(gig) = txn.gig(bid.gig_id).map_err(store_err)? else {
            txn.abort();
            return Err(MarketError::GigNotFound(bid.gig_id));
        };

        if gig.owner_id != acting_user {
            txn.abort();
            return Err(MarketError::forbidden("Not authorized to hire for this gig"));
        }

        if gig.status != GigStatus::Open {
            txn.abort();
            return Err(MarketError::AlreadyAssigned);
        }

        if bid.status != BidStatus::Pending {
            txn.abort();
            return Err(MarketError::BidNotPending);
        }

        // Owner display name for the hired notification, read in-session.
        let owner_name = txn
            .user(gig.owner_id)
            .map_err(store_err)?
            .map(|u| u.name)
            .unwrap_or_default();

        // The write itself is conditioned on the gig still being open,
        // re-verified at commit independent of the reads above. A matched
        // count of zero means a concurrent call assigned the gig between
        // our read and this write.
        let matched = txn
            .assign_gig_if_open(gig.id, bid.freelancer_id)
            .map_err(store_err)?;
        if matched == 0 {
            txn.abort();
            return Err(MarketError::AlreadyAssigned);
        }

        txn.set_bid_status(bid.id, BidStatus::Hired).map_err(store_err)?;
        let rejected = txn.reject_pending_bids(gig.id, bid.id).map_err(store_err)?;

        txn.commit().map_err(store_err)?;

        // Re-read committed state for the response.
        let gig = self
            .store
            .get_gig(gig.id)
            .ok_or(MarketError::GigNotFound(gig.id))?;
        let bid = self
            .store
            .get_bid(bid.id)
            .ok_or(MarketError::BidNotFound(bid.id))?;
        let rejected = rejected
            .iter()
            .filter_map(|b| self.store.get_bid(b.id))
            .collect();

        Ok(HireOutcome {
            gig,
            bid,
            rejected,
            owner_name,
        })
    }

    /// Post-commit fan-out. Fire-and-forget: a dropped delivery cannot roll
    /// back the committed hire and is never surfaced to the caller.
    fn fan_out(&self, outcome: &HireOutcome) {
        let delivered = self.notifier.publish(
            &outcome.bid.freelancer_id,
            Notification::Hired {
                gig_id: outcome.gig.id,
                gig_title: outcome.gig.title.clone(),
                budget: outcome.gig.budget,
                owner_name: outcome.owner_name.clone(),
                bid_id: outcome.bid.id,
                price: outcome.bid.price,
            },
        );
        self.metrics.notification(delivered);

        for rejected in &outcome.rejected {
            let delivered = self.notifier.publish(
                &rejected.freelancer_id,
                Notification::BidRejected {
                    gig_title: outcome.gig.title.clone(),
                },
            );
            self.metrics.notification(delivered);
        }
    }
}

/// Map store failures onto the caller-facing taxonomy: a failed guard means
/// the gig was just assigned by a concurrent call; a version conflict means
/// the commit lost and the caller may try again.
pub(crate) fn store_err(e: StoreError) -> MarketError {
    match e {
        StoreError::ConditionFailed => MarketError::AlreadyAssigned,
        StoreError::WriteConflict => MarketError::WriteConflict,
        StoreError::DuplicateBid => MarketError::DuplicateBid,
        StoreError::Internal(msg) => MarketError::Store(msg),
    }
}
