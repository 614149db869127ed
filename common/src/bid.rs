//! Bid record and its status state machine.

use crate::{BidId, GigId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bid lifecycle status.
///
/// A bid starts `Pending` and is decided exactly once by the hire
/// coordinator: the winning bid becomes `Hired`, every other bid on the same
/// gig becomes `Rejected`. Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    /// Awaiting the owner's decision.
    Pending,
    /// Accepted by the gig owner; terminal.
    Hired,
    /// Lost to another bid; terminal.
    Rejected,
}

impl BidStatus {
    /// Check if this is a final state.
    pub fn is_final(&self) -> bool {
        matches!(self, BidStatus::Hired | BidStatus::Rejected)
    }

    /// Get valid next states from current state.
    pub fn valid_transitions(&self) -> &[BidStatus] {
        match self {
            BidStatus::Pending => &[BidStatus::Hired, BidStatus::Rejected],
            BidStatus::Hired => &[],
            BidStatus::Rejected => &[],
        }
    }

    /// Check if transition to given state is valid.
    pub fn can_transition_to(&self, next: BidStatus) -> bool {
        self.valid_transitions().contains(&next)
    }
}

/// A freelancer's proposal against a specific gig.
///
/// At most one bid may exist per `(gig_id, freelancer_id)` pair; the store
/// enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    /// Unique bid identifier.
    pub id: BidId,
    /// Gig this bid targets.
    pub gig_id: GigId,
    /// Freelancer who submitted the bid.
    pub freelancer_id: UserId,
    /// Proposed price.
    pub price: Decimal,
    /// Pitch message to the gig owner.
    pub message: String,
    /// Current status.
    pub status: BidStatus,
    /// When the bid was submitted.
    pub created_at: DateTime<Utc>,
    /// When the bid was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Bid {
    /// Create a new pending bid.
    pub fn new(
        gig_id: GigId,
        freelancer_id: UserId,
        price: Decimal,
        message: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BidId::new(),
            gig_id,
            freelancer_id,
            price,
            message: message.into(),
            status: BidStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the bid is still awaiting a decision.
    pub fn is_pending(&self) -> bool {
        self.status == BidStatus::Pending
    }

    /// Transition to a new status.
    pub fn transition_to(&mut self, next: BidStatus) -> Result<(), InvalidBidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidBidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Error when attempting an invalid bid state transition.
#[derive(Debug, Clone)]
pub struct InvalidBidTransition {
    pub from: BidStatus,
    pub to: BidStatus,
}

impl std::fmt::Display for InvalidBidTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid bid transition from {:?} to {:?}",
            self.from, self.to
        )
    }
}

impl std::error::Error for InvalidBidTransition {}
