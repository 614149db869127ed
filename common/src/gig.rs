//! Gig record and its status state machine.

use crate::{GigId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Gig lifecycle status.
///
/// A gig is `Open` for bidding until the owner hires a freelancer, at which
/// point it becomes `Assigned`. There is no transition back to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    /// Accepting bids.
    Open,
    /// A freelancer has been hired; terminal.
    Assigned,
}

impl GigStatus {
    /// Check if this is a final state.
    pub fn is_final(&self) -> bool {
        matches!(self, GigStatus::Assigned)
    }

    /// Check if transition to given state is valid.
    pub fn can_transition_to(&self, next: GigStatus) -> bool {
        matches!((self, next), (GigStatus::Open, GigStatus::Assigned))
    }
}

/// A posted job open for bidding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gig {
    /// Unique gig identifier.
    pub id: GigId,
    /// User who posted the gig.
    pub owner_id: UserId,
    /// Short title shown in listings.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Offered budget.
    pub budget: Decimal,
    /// Current status.
    pub status: GigStatus,
    /// Winning freelancer, set when the gig is assigned.
    /// Invariant: `Some` iff `status == Assigned`.
    pub hired_freelancer_id: Option<UserId>,
    /// When the gig was posted.
    pub created_at: DateTime<Utc>,
    /// When the gig was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Gig {
    /// Create a new open gig.
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        budget: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GigId::new(),
            owner_id,
            title: title.into(),
            description: description.into(),
            budget,
            status: GigStatus::Open,
            hired_freelancer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the gig is still accepting bids.
    pub fn is_open(&self) -> bool {
        self.status == GigStatus::Open
    }

    /// Assign the gig to the given freelancer.
    ///
    /// Only valid while `Open`; the transition is terminal.
    pub fn assign(&mut self, freelancer_id: UserId) -> Result<(), InvalidGigTransition> {
        if !self.status.can_transition_to(GigStatus::Assigned) {
            return Err(InvalidGigTransition {
                from: self.status,
                to: GigStatus::Assigned,
            });
        }
        self.status = GigStatus::Assigned;
        self.hired_freelancer_id = Some(freelancer_id);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Error when attempting an invalid gig state transition.
#[derive(Debug, Clone)]
pub struct InvalidGigTransition {
    pub from: GigStatus,
    pub to: GigStatus,
}

impl std::fmt::Display for InvalidGigTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid gig transition from {:?} to {:?}",
            self.from, self.to
        )
    }
}

impl std::error::Error for InvalidGigTransition {}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_gig() -> Gig {
        Gig::new(
            UserId::new(),
            "Build a landing page",
            "Need a responsive landing page for a product launch",
            Decimal::from(500),
        )
    }

    #[test]
    fn test_new_gig_is_open() {
        let gig = create_test_gig();
        assert!(gig.is_open());
        assert!(gig.hired_freelancer_id.is_none());
    }

    #[test]
    fn test_assign_sets_freelancer() {
        let mut gig = create_test_gig();
        let freelancer = UserId::new();

        gig.assign(freelancer).unwrap();

        assert_eq!(gig.status, GigStatus::Assigned);
        assert_eq!(gig.hired_freelancer_id, Some(freelancer));
    }

    #[test]
    fn test_assign_twice_fails() {
        let mut gig = create_test_gig();
        gig.assign(UserId::new()).unwrap();

        // Assigned is terminal
        assert!(gig.assign(UserId::new()).is_err());
    }

    #[test]
    fn test_status_transitions() {
        assert!(GigStatus::Open.can_transition_to(GigStatus::Assigned));
        assert!(!GigStatus::Assigned.can_transition_to(GigStatus::Open));
        assert!(GigStatus::Assigned.is_final());
        assert!(!GigStatus::Open.is_final());
    }
}
