//! Error types for GigDesk operations.

use crate::{BidId, GigId, UserId};
use thiserror::Error;

/// Main error type for marketplace operations.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Referenced bid does not exist.
    #[error("Bid not found: {0}")]
    BidNotFound(BidId),

    /// Referenced gig does not exist.
    #[error("Gig not found: {0}")]
    GigNotFound(GigId),

    /// Referenced user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Acting user is not allowed to perform this operation.
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// The gig has already been assigned to a freelancer.
    /// Raised both by the precondition check and by the conditional write
    /// matching zero documents when a concurrent hire won the race.
    #[error("This gig has already been assigned to another freelancer")]
    AlreadyAssigned,

    /// The bid has already been decided (hired or rejected).
    #[error("This bid is no longer pending")]
    BidNotPending,

    /// The gig is no longer accepting bids.
    #[error("This gig is no longer accepting bids")]
    GigNotOpen,

    /// Owners may not bid on their own gigs.
    #[error("You cannot bid on your own gig")]
    OwnGig,

    /// The freelancer already has a bid on this gig.
    #[error("You have already submitted a bid for this gig")]
    DuplicateBid,

    /// Two transactions touched the same documents; the commit lost.
    #[error("Another hiring operation is in progress. Please try again.")]
    WriteConflict,

    /// An assigned gig can no longer be edited.
    #[error("Cannot update an assigned gig")]
    GigAssigned,

    /// A field failed validation.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Store-level failure; the transaction was aborted.
    #[error("Store error: {0}")]
    Store(String),
}

impl MarketError {
    /// Check if this error is retryable.
    ///
    /// Conflict-class errors are retryable in principle (the caller may
    /// re-fetch state and decide); the coordinator itself never auto-retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MarketError::WriteConflict | MarketError::Store(_)
        )
    }

    /// Get error code for wire responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            MarketError::BidNotFound(_) => "BID_NOT_FOUND",
            MarketError::GigNotFound(_) => "GIG_NOT_FOUND",
            MarketError::UserNotFound(_) => "USER_NOT_FOUND",
            MarketError::Forbidden { .. } => "FORBIDDEN",
            MarketError::AlreadyAssigned => "ALREADY_ASSIGNED",
            MarketError::BidNotPending => "BID_NOT_PENDING",
            MarketError::GigNotOpen => "GIG_NOT_OPEN",
            MarketError::OwnGig => "OWN_GIG",
            MarketError::DuplicateBid => "DUPLICATE_BID",
            MarketError::WriteConflict => "WRITE_CONFLICT",
            MarketError::GigAssigned => "GIG_ASSIGNED",
            MarketError::Validation { .. } => "VALIDATION_FAILED",
            MarketError::Store(_) => "STORE_ERROR",
        }
    }

    /// Map to the HTTP status code of the caller contract:
    /// 404 for missing documents, 403 for authorization failures, 409 for
    /// every way of losing the race, 400 for bad input, 500 otherwise.
    pub fn http_status(&self) -> u16 {
        match self {
            MarketError::BidNotFound(_)
            | MarketError::GigNotFound(_)
            | MarketError::UserNotFound(_) => 404,
            MarketError::Forbidden { .. } => 403,
            MarketError::AlreadyAssigned
            | MarketError::BidNotPending
            | MarketError::WriteConflict
            | MarketError::GigNotOpen
            | MarketError::GigAssigned => 409,
            MarketError::OwnGig
            | MarketError::DuplicateBid
            | MarketError::Validation { .. } => 400,
            MarketError::Store(_) => 500,
        }
    }

    /// Build a forbidden error with a reason.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        MarketError::Forbidden {
            reason: reason.into(),
        }
    }

    /// Build a validation error for a named field.
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        MarketError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

/// Result type alias for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketError>;
