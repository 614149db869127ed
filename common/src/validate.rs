//! Field validation limits and checks.

use crate::{MarketError, Result};
use rust_decimal::Decimal;

/// Field limits for gigs and bids.
pub mod limits {
    /// Minimum gig title length.
    pub const TITLE_MIN: usize = 5;
    /// Maximum gig title length.
    pub const TITLE_MAX: usize = 100;
    /// Minimum gig description length.
    pub const DESCRIPTION_MIN: usize = 20;
    /// Maximum gig description length.
    pub const DESCRIPTION_MAX: usize = 2000;
    /// Minimum bid message length.
    pub const MESSAGE_MIN: usize = 10;
    /// Maximum bid message length.
    pub const MESSAGE_MAX: usize = 1000;
    /// Maximum gig budget in dollars.
    pub const BUDGET_MAX: u32 = 1_000_000;
}

fn check_len(value: &str, min: usize, max: usize, field: &str) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(MarketError::validation(
            format!("{field} must be at least {min} characters"),
            field,
        ));
    }
    if len > max {
        return Err(MarketError::validation(
            format!("{field} cannot exceed {max} characters"),
            field,
        ));
    }
    Ok(())
}

/// Validate a gig title.
pub fn gig_title(title: &str) -> Result<()> {
    check_len(title, limits::TITLE_MIN, limits::TITLE_MAX, "title")
}

/// Validate a gig description.
pub fn gig_description(description: &str) -> Result<()> {
    check_len(
        description,
        limits::DESCRIPTION_MIN,
        limits::DESCRIPTION_MAX,
        "description",
    )
}

/// Validate a gig budget: at least $1, at most $1,000,000.
pub fn gig_budget(budget: Decimal) -> Result<()> {
    if budget < Decimal::ONE {
        return Err(MarketError::validation("Budget must be at least $1", "budget"));
    }
    if budget > Decimal::from(limits::BUDGET_MAX) {
        return Err(MarketError::validation(
            "Budget cannot exceed $1,000,000",
            "budget",
        ));
    }
    Ok(())
}

/// Validate a bid message.
pub fn bid_message(message: &str) -> Result<()> {
    check_len(message, limits::MESSAGE_MIN, limits::MESSAGE_MAX, "message")
}

/// Validate a bid price: at least $1.
pub fn bid_price(price: Decimal) -> Result<()> {
    if price < Decimal::ONE {
        return Err(MarketError::validation("Price must be at least $1", "price"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_limits() {
        assert!(gig_title("Logo").is_err());
        assert!(gig_title("Logo design").is_ok());
        assert!(gig_title(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_budget_limits() {
        assert!(gig_budget(Decimal::ZERO).is_err());
        assert!(gig_budget(Decimal::from(500)).is_ok());
        assert!(gig_budget(Decimal::from(1_000_001)).is_err());
    }

    #[test]
    fn test_bid_message_limits() {
        assert!(bid_message("too short").is_err());
        assert!(bid_message("I can deliver this within a week").is_ok());
    }

    #[test]
    fn test_price_minimum() {
        assert!(bid_price(Decimal::ZERO).is_err());
        assert!(bid_price(Decimal::ONE).is_ok());
    }
}
